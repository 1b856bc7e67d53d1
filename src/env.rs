use crate::*;
use fxhash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Name -> value bindings of one lexical level.
#[derive(Debug, Default)]
pub struct Environment {
    table: FxHashMap<IdentId, Value>,
    parent: Option<EnvRef>,
}

/// Shared handle to an `Environment`.
///
/// A method keeps the environment it was defined in alive through its
/// captured `Scope`, and every call of that method chains a fresh
/// environment onto it.
#[derive(Debug, Clone, Default)]
pub struct EnvRef(Rc<RefCell<Environment>>);

impl PartialEq for EnvRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl EnvRef {
    pub fn new() -> Self {
        EnvRef::default()
    }

    /// Create an empty environment whose lookups fall through to `self`.
    pub fn new_child(&self) -> Self {
        EnvRef(Rc::new(RefCell::new(Environment {
            table: FxHashMap::default(),
            parent: Some(self.clone()),
        })))
    }

    pub fn parent(&self) -> Option<EnvRef> {
        self.0.borrow().parent.clone()
    }

    /// Look `id` up in this environment, then along the parent chain.
    pub fn get(&self, id: IdentId) -> Option<Value> {
        let mut env = self.clone();
        loop {
            let parent = {
                let inner = env.0.borrow();
                if let Some(val) = inner.table.get(&id) {
                    return Some(val.clone());
                }
                inner.parent.clone()
            };
            match parent {
                Some(parent) => env = parent,
                None => return None,
            }
        }
    }

    /// Bind `id` in this environment, shadowing any binding in a parent.
    pub fn set(&self, id: IdentId, val: Value) -> Option<Value> {
        debug_assert!(!val.is_signal(), "control signal stored in environment");
        self.0.borrow_mut().table.insert(id, val)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
