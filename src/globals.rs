use crate::*;

/// Everything one interpreter instance owns.
///
/// Two `Globals` never share classes, instances or environments.
#[derive(Debug)]
pub struct Globals {
    pub class_table: GlobalClassTable,
    pub instance_table: GlobalInstanceTable,
    main_env: EnvRef,
}

impl Default for Globals {
    fn default() -> Self {
        Globals::new()
    }
}

impl Globals {
    pub fn new() -> Self {
        Globals {
            class_table: GlobalClassTable::new(),
            instance_table: GlobalInstanceTable::new(),
            main_env: EnvRef::new(),
        }
    }

    pub fn main_env(&self) -> &EnvRef {
        &self.main_env
    }

    /// The top-level receiver. Every call returns the same object.
    pub fn main_object(&self) -> Value {
        Value::Main(self.main_env.clone())
    }

    /// Scope top-level code runs in.
    pub fn main_scope(&self) -> Scope {
        Scope::new(self.main_object(), self.main_env.clone())
    }

    pub fn new_instance(&mut self, class: ClassRef) -> Value {
        Value::BaseObject(self.instance_table.new_instance(class))
    }

    pub fn class_of(&self, instance: InstanceRef) -> ClassRef {
        self.instance_table[instance].class
    }

    pub fn inspect_instance(&self, instance: InstanceRef) -> String {
        let info = &self.instance_table[instance];
        let name = &self.class_table[info.class].name;
        if info.instance_var.is_empty() {
            return format!("#<{}>", name);
        }
        let mut vars = info
            .instance_var
            .iter()
            .map(|(id, val)| (IdentId::get_name(*id), val.inspect(self)))
            .collect::<Vec<_>>();
        vars.sort();
        let vars = vars
            .iter()
            .map(|(name, val)| format!("@{}={}", name, val))
            .collect::<Vec<_>>();
        format!("#<{} {}>", name, vars.join(", "))
    }
}
