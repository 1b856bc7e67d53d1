use crate::*;
use std::fmt;
use std::rc::Rc;

/// Runtime value.
///
/// The variant set is closed: the evaluator dispatches on it with exhaustive
/// `match`es, and `value_type()` exposes the same information as a tag for
/// dynamic checks and error messages.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    String(String),
    Boolean(bool),
    Null,
    /// Unwinds to the nearest method-call boundary, yielding the wrapped value.
    ReturnValue(Box<Value>),
    /// Unwinds to the top level.
    Error(Box<ErrorObj>),
    Method(MethodRef),
    BuiltInMethod(BuiltinRef),
    Class(ClassRef),
    BaseObject(InstanceRef),
    /// The implicit top-level receiver. Holds the process-wide environment.
    Main(EnvRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    String,
    Boolean,
    Null,
    ReturnValue,
    Error,
    Method,
    BuiltInMethod,
    Class,
    BaseObject,
    Main,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Integer => "INTEGER",
            ValueType::String => "STRING",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Null => "NULL",
            ValueType::ReturnValue => "RETURN_VALUE",
            ValueType::Error => "ERROR",
            ValueType::Method => "METHOD",
            ValueType::BuiltInMethod => "BUILD_IN_METHOD",
            ValueType::Class => "CLASS",
            ValueType::BaseObject => "BASE_OBJECT",
            ValueType::Main => "MAIN_OBJECT",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural equality for immutable scalars, identity for everything else.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => lhs == rhs,
            (Value::String(lhs), Value::String(rhs)) => lhs == rhs,
            (Value::Boolean(lhs), Value::Boolean(rhs)) => lhs == rhs,
            (Value::Null, Value::Null) => true,
            (Value::ReturnValue(lhs), Value::ReturnValue(rhs)) => lhs == rhs,
            (Value::Error(lhs), Value::Error(rhs)) => lhs == rhs,
            (Value::Method(lhs), Value::Method(rhs)) => Rc::ptr_eq(lhs, rhs),
            (Value::BuiltInMethod(lhs), Value::BuiltInMethod(rhs)) => Rc::ptr_eq(lhs, rhs),
            (Value::Class(lhs), Value::Class(rhs)) => lhs == rhs,
            (Value::BaseObject(lhs), Value::BaseObject(rhs)) => lhs == rhs,
            (Value::Main(lhs), Value::Main(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl Value {
    pub const TRUE: Value = Value::Boolean(true);
    pub const FALSE: Value = Value::Boolean(false);
    pub const NULL: Value = Value::Null;

    pub fn bool(b: bool) -> Self {
        if b {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn return_value(val: Value) -> Self {
        Value::ReturnValue(Box::new(val))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::String(_) => ValueType::String,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Null => ValueType::Null,
            Value::ReturnValue(_) => ValueType::ReturnValue,
            Value::Error(_) => ValueType::Error,
            Value::Method(_) => ValueType::Method,
            Value::BuiltInMethod(_) => ValueType::BuiltInMethod,
            Value::Class(_) => ValueType::Class,
            Value::BaseObject(_) => ValueType::BaseObject,
            Value::Main(_) => ValueType::Main,
        }
    }

    /// `ReturnValue` or `Error`: a transient result that must be propagated,
    /// never stored or passed as an argument.
    pub fn is_signal(&self) -> bool {
        matches!(self, Value::ReturnValue(_) | Value::Error(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// `false` and `null` are falsy, everything else is truthy.
    pub fn to_bool(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<ClassRef> {
        match self {
            Value::Class(class) => Some(*class),
            _ => None,
        }
    }

    /// Debug rendering. Not guaranteed to be parseable.
    pub fn inspect(&self, globals: &Globals) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::String(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::ReturnValue(val) => val.inspect(globals),
            Value::Error(err) => format!("ERROR: {}", err.message),
            Value::Method(method) => method.inspect(),
            Value::BuiltInMethod(builtin) => builtin.description.clone(),
            Value::Class(class) => globals.class_table[*class].inspect(),
            Value::BaseObject(instance) => globals.inspect_instance(*instance),
            Value::Main(_) => "Main Object".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types() {
        assert_eq!(ValueType::Integer, Value::Integer(3).value_type());
        assert_eq!(ValueType::Boolean, Value::TRUE.value_type());
        assert_eq!(ValueType::Null, Value::NULL.value_type());
        assert_eq!(
            ValueType::ReturnValue,
            Value::return_value(Value::Null).value_type()
        );
        assert_eq!(
            ValueType::Error,
            ErrorObj::runtime("boom").into_value().value_type()
        );
        assert_eq!("BUILD_IN_METHOD", ValueType::BuiltInMethod.as_str());
        assert_eq!("MAIN_OBJECT", ValueType::Main.to_string());
    }

    #[test]
    fn inspect_scalars() {
        let globals = Globals::new();
        assert_eq!("-42", Value::Integer(-42).inspect(&globals));
        assert_eq!("Ruby", Value::string("Ruby").inspect(&globals));
        assert_eq!("true", Value::bool(true).inspect(&globals));
        assert_eq!("false", Value::bool(false).inspect(&globals));
        assert_eq!("null", Value::Null.inspect(&globals));
        assert_eq!(
            "7",
            Value::return_value(Value::Integer(7)).inspect(&globals)
        );
        assert_eq!(
            "ERROR: boom",
            ErrorObj::runtime("boom").into_value().inspect(&globals)
        );
        assert_eq!("Main Object", globals.main_object().inspect(&globals));
    }

    #[test]
    fn booleans_are_singletons() {
        assert_eq!(Value::TRUE, Value::bool(true));
        assert_eq!(Value::FALSE, Value::bool(false));
        assert_ne!(Value::TRUE, Value::FALSE);
    }

    #[test]
    fn signals() {
        assert!(Value::return_value(Value::Integer(1)).is_signal());
        assert!(ErrorObj::runtime("x").into_value().is_signal());
        assert!(!Value::Integer(1).is_signal());
        assert!(!Value::Null.to_bool());
        assert!(!Value::FALSE.to_bool());
        assert!(Value::Integer(0).to_bool());
    }

    #[test]
    fn identity_equality() {
        let env = EnvRef::new();
        assert_eq!(Value::Main(env.clone()), Value::Main(env));
        assert_ne!(Value::Main(EnvRef::new()), Value::Main(EnvRef::new()));
        assert_ne!(Value::Integer(1), Value::string("1"));
    }
}
