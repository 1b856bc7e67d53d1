use crate::*;
use ansi_term::Colour::Red;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrKind {
    NoMethod,
    Argument,
    Type,
    Name,
    Runtime,
    SystemStack,
}

impl RuntimeErrKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeErrKind::NoMethod => "NoMethodError",
            RuntimeErrKind::Argument => "ArgumentError",
            RuntimeErrKind::Type => "TypeError",
            RuntimeErrKind::Name => "NameError",
            RuntimeErrKind::Runtime => "RuntimeError",
            RuntimeErrKind::SystemStack => "SystemStackError",
        }
    }
}

/// Payload of `Value::Error`.
///
/// Runtime errors never leave the interpreter as host panics; they travel as
/// ordinary values until a call boundary or the top level consumes them.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorObj {
    pub kind: RuntimeErrKind,
    pub message: String,
    pub loc: Option<Loc>,
}

impl fmt::Display for ErrorObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind.as_str(), self.message)
    }
}

impl ErrorObj {
    pub fn new(kind: RuntimeErrKind, message: impl Into<String>) -> Self {
        ErrorObj {
            kind,
            message: message.into(),
            loc: None,
        }
    }

    /// Attach `loc` unless the error already points somewhere more precise.
    pub fn with_loc(mut self, loc: Loc) -> Self {
        if self.loc.is_none() {
            self.loc = Some(loc);
        }
        self
    }

    pub fn into_value(self) -> Value {
        Value::Error(Box::new(self))
    }

    pub fn show_err(&self) {
        eprint!("{}", Red.bold().paint(self.kind.as_str()));
        match self.loc {
            Some(Loc(start, end)) => eprintln!(" ({}) at {}..{}", self.message, start, end),
            None => eprintln!(" ({})", self.message),
        }
    }
}

impl ErrorObj {
    pub fn undefined_method(method: IdentId, receiver: impl Into<String>) -> Self {
        ErrorObj::new(
            RuntimeErrKind::NoMethod,
            format!(
                "undefined method `{:?}' for {}",
                method,
                receiver.into()
            ),
        )
    }

    pub fn wrong_arguments(given: usize, expected: usize) -> Self {
        ErrorObj::new(
            RuntimeErrKind::Argument,
            format!(
                "wrong number of arguments (given {}, expected {})",
                given, expected
            ),
        )
    }

    pub fn typeerr(msg: impl Into<String>) -> Self {
        ErrorObj::new(RuntimeErrKind::Type, msg)
    }

    pub fn name(msg: impl Into<String>) -> Self {
        ErrorObj::new(RuntimeErrKind::Name, msg)
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        ErrorObj::new(RuntimeErrKind::Runtime, msg)
    }

    pub fn stack_overflow() -> Self {
        ErrorObj::new(RuntimeErrKind::SystemStack, "stack level too deep")
    }
}
