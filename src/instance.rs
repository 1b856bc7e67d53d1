use crate::*;
use fxhash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceRef(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceInfo {
    pub class: ClassRef,
    pub instance_var: FxHashMap<IdentId, Value>,
}

impl InstanceInfo {
    pub fn new(class: ClassRef) -> Self {
        InstanceInfo {
            class,
            instance_var: FxHashMap::default(),
        }
    }

    /// Unset instance variables read as `null`.
    pub fn get_var(&self, id: IdentId) -> Value {
        self.instance_var.get(&id).cloned().unwrap_or(Value::Null)
    }

    pub fn set_var(&mut self, id: IdentId, val: Value) {
        debug_assert!(!val.is_signal(), "control signal stored in instance variable");
        self.instance_var.insert(id, val);
    }
}

#[derive(Debug, Default)]
pub struct GlobalInstanceTable {
    table: Vec<InstanceInfo>,
}

impl std::ops::Index<InstanceRef> for GlobalInstanceTable {
    type Output = InstanceInfo;
    fn index(&self, instance: InstanceRef) -> &InstanceInfo {
        &self.table[instance.0]
    }
}

impl std::ops::IndexMut<InstanceRef> for GlobalInstanceTable {
    fn index_mut(&mut self, instance: InstanceRef) -> &mut InstanceInfo {
        &mut self.table[instance.0]
    }
}

impl GlobalInstanceTable {
    pub fn new() -> Self {
        GlobalInstanceTable::default()
    }

    pub fn new_instance(&mut self, class: ClassRef) -> InstanceRef {
        let instance = InstanceRef(self.table.len());
        self.table.push(InstanceInfo::new(class));
        instance
    }
}
