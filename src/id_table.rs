use fxhash::FxHashMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::RwLock;

static ID: Lazy<RwLock<IdentifierTable>> = Lazy::new(|| RwLock::new(IdentifierTable::new()));

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentId(NonZeroU32);

impl fmt::Debug for IdentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::get_name(*self))
    }
}

impl Into<u32> for IdentId {
    fn into(self) -> u32 {
        self.0.get()
    }
}

macro_rules! id {
    ($constant:expr) => {
        IdentId(unsafe { std::num::NonZeroU32::new_unchecked($constant) })
    };
}

impl IdentId {
    pub const INITIALIZE: IdentId = id!(1);
    pub const NEW: IdentId = id!(2);
}

impl IdentId {
    pub fn get_id(name: &str) -> Self {
        match ID.write() {
            Ok(mut table) => table.get_ident_id(name),
            Err(poisoned) => poisoned.into_inner().get_ident_id(name),
        }
    }

    pub fn get_name(id: IdentId) -> String {
        match ID.read() {
            Ok(table) => table.get_name(id).to_string(),
            Err(poisoned) => poisoned.into_inner().get_name(id).to_string(),
        }
    }
}

/// Interned identifier names.
///
/// Ids are dense: `names[id]` is the name of `id`. Slot 0 is a dummy so that
/// every real id fits in a `NonZeroU32`.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierTable {
    table: FxHashMap<String, u32>,
    names: Vec<String>,
}

impl IdentifierTable {
    fn new() -> Self {
        let mut table = IdentifierTable {
            table: FxHashMap::default(),
            names: vec!["<null>".to_string()],
        };
        table.set_ident_id("initialize", IdentId::INITIALIZE);
        table.set_ident_id("new", IdentId::NEW);
        table
    }

    fn set_ident_id(&mut self, name: impl Into<String>, id: IdentId) {
        let name = name.into();
        let id: u32 = id.into();
        debug_assert_eq!(self.names.len() as u32, id);
        self.table.insert(name.clone(), id);
        self.names.push(name);
    }

    fn get_ident_id(&mut self, name: &str) -> IdentId {
        let id = match self.table.get(name) {
            Some(id) => *id,
            None => {
                let id = self.names.len() as u32;
                self.table.insert(name.to_string(), id);
                self.names.push(name.to_string());
                id
            }
        };
        IdentId(NonZeroU32::new(id).unwrap_or(NonZeroU32::MIN))
    }

    fn get_name(&self, id: IdentId) -> &str {
        &self.names[id.0.get() as usize]
    }
}
