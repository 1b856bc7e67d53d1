use crate::*;

/// Binding context of one evaluation step: who is executing (`self_value`)
/// and which names are visible (`env`).
///
/// Created per call or class body and dropped when it finishes, except the
/// one a `MethodObj` captures at definition time.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub self_value: Value,
    pub env: EnvRef,
}

impl Scope {
    pub fn new(self_value: Value, env: EnvRef) -> Self {
        Scope { self_value, env }
    }
}
