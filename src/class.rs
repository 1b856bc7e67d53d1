use crate::*;

/// Index of a class in the `GlobalClassTable`.
///
/// A `ClassRef` does not own the class it names. Subclasses refer to their
/// superclass through one, so the inheritance tree is a set of back-references
/// into the table rather than a pointer graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassRef(usize);

/// Selects one of the two method tables of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Instance,
    Class,
}

#[derive(Debug)]
pub struct ClassInfo {
    pub name: String,
    /// Scope class bodies are evaluated in. Reopening the class reuses it.
    pub scope: Scope,
    instance_methods: MethodTable,
    class_methods: MethodTable,
    superclass: Option<ClassRef>,
}

impl ClassInfo {
    pub fn superclass(&self) -> Option<ClassRef> {
        self.superclass
    }

    /// Insert or overwrite an instance method. Returns the replaced entry.
    pub fn define_instance_method(&mut self, id: IdentId, info: MethodInfo) -> Option<MethodInfo> {
        self.instance_methods.insert(id, info)
    }

    /// Insert or overwrite a class method. Returns the replaced entry.
    pub fn define_class_method(&mut self, id: IdentId, info: MethodInfo) -> Option<MethodInfo> {
        self.class_methods.insert(id, info)
    }

    pub fn define_method(
        &mut self,
        kind: MethodKind,
        id: IdentId,
        info: MethodInfo,
    ) -> Option<MethodInfo> {
        match kind {
            MethodKind::Instance => self.define_instance_method(id, info),
            MethodKind::Class => self.define_class_method(id, info),
        }
    }

    pub fn method_table(&self, kind: MethodKind) -> &MethodTable {
        match kind {
            MethodKind::Instance => &self.instance_methods,
            MethodKind::Class => &self.class_methods,
        }
    }

    /// Look `id` up in this class's own table of `kind`, ignoring superclasses.
    pub fn get_method(&self, id: IdentId, kind: MethodKind) -> Option<&MethodInfo> {
        self.method_table(kind).get(&id)
    }

    pub fn inspect(&self) -> String {
        format!("<Class:{}>", self.name)
    }
}

#[derive(Debug, Default)]
pub struct GlobalClassTable {
    table: Vec<ClassInfo>,
}

impl std::ops::Index<ClassRef> for GlobalClassTable {
    type Output = ClassInfo;
    fn index(&self, class: ClassRef) -> &ClassInfo {
        &self.table[class.0]
    }
}

impl std::ops::IndexMut<ClassRef> for GlobalClassTable {
    fn index_mut(&mut self, class: ClassRef) -> &mut ClassInfo {
        &mut self.table[class.0]
    }
}

impl GlobalClassTable {
    pub fn new() -> Self {
        GlobalClassTable::default()
    }

    /// Register a new class.
    ///
    /// `superclass` can only name a class that is already in the table, so
    /// every superclass chain is finite and acyclic.
    /// The class body scope has the new class as `self` and a fresh
    /// environment chained onto `outer`.
    pub fn new_class(
        &mut self,
        id: IdentId,
        superclass: Option<ClassRef>,
        outer: &EnvRef,
    ) -> ClassRef {
        let class = ClassRef(self.table.len());
        let info = ClassInfo {
            name: IdentId::get_name(id),
            scope: Scope::new(Value::Class(class), outer.new_child()),
            instance_methods: MethodTable::default(),
            class_methods: MethodTable::default(),
            superclass,
        };
        self.table.push(info);
        class
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// `class` followed by its superclasses, nearest first.
    pub fn ancestors(&self, class: ClassRef) -> Ancestors<'_> {
        Ancestors {
            table: self,
            next: Some(class),
        }
    }

    /// Method resolution.
    ///
    /// Looks `id` up in the `kind` table of `class`, then of each superclass
    /// in turn. The entry nearest to `class` wins. Instance and class
    /// methods are resolved independently: one kind never falls back to
    /// the other.
    pub fn search_method(&self, class: ClassRef, id: IdentId, kind: MethodKind) -> Option<MethodInfo> {
        self.search_method_and_owner(class, id, kind)
            .map(|(info, _)| info)
    }

    /// Same as `search_method`, also returning the class the entry was found in.
    pub fn search_method_and_owner(
        &self,
        class: ClassRef,
        id: IdentId,
        kind: MethodKind,
    ) -> Option<(MethodInfo, ClassRef)> {
        self.ancestors(class)
            .find_map(|c| self[c].get_method(id, kind).map(|info| (info.clone(), c)))
    }

    /// Get the method for `id`, or a NoMethodError if the chain is exhausted.
    pub fn get_method_or_nomethod(
        &self,
        class: ClassRef,
        id: IdentId,
        kind: MethodKind,
    ) -> Result<MethodInfo, ErrorObj> {
        match self.search_method(class, id, kind) {
            Some(info) => Ok(info),
            None => {
                let receiver = match kind {
                    MethodKind::Instance => format!("an instance of {}", self[class].name),
                    MethodKind::Class => self[class].inspect(),
                };
                Err(ErrorObj::undefined_method(id, receiver))
            }
        }
    }
}

pub struct Ancestors<'a> {
    table: &'a GlobalClassTable,
    next: Option<ClassRef>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = ClassRef;
    fn next(&mut self) -> Option<ClassRef> {
        let class = self.next?;
        self.next = self.table[class].superclass();
        Some(class)
    }
}
