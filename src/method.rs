use crate::*;
use fxhash::FxHashMap;
use std::fmt;
use std::rc::Rc;

pub type MethodRef = Rc<MethodObj>;
pub type BuiltinRef = Rc<BuiltinMethod>;

/// Native method body. Receives the evaluated arguments only: built-ins have
/// no access to `self` or to the lexical scope, and check their own arity.
pub type BuiltinFunc = fn(args: &[Value]) -> Value;

pub type MethodTable = FxHashMap<IdentId, MethodInfo>;

/// User-defined method.
pub struct MethodObj {
    pub name: IdentId,
    pub params: Vec<IdentId>,
    pub body: Node,
    /// The scope the method was defined in. Read-only after definition.
    pub scope: Scope,
}

impl fmt::Debug for MethodObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The captured scope may contain this very method, so it is not printed.
        write!(f, "Method {:?}({:?})", self.name, self.params)
    }
}

impl MethodObj {
    pub fn new(name: IdentId, params: Vec<IdentId>, body: Node, scope: Scope) -> MethodRef {
        Rc::new(MethodObj {
            name,
            params,
            body,
            scope,
        })
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Build the scope one invocation of this method runs in.
    ///
    /// The new environment is fresh for every call and chained onto the
    /// captured environment, so the body sees its defining context without
    /// ever writing into it through its parameters.
    pub fn call_scope(&self, receiver: Value, args: &[Value]) -> Result<Scope, ErrorObj> {
        if args.len() != self.arity() {
            return Err(ErrorObj::wrong_arguments(args.len(), self.arity()));
        }
        let env = self.scope.env.new_child();
        for (param, arg) in self.params.iter().zip(args) {
            env.set(*param, arg.clone());
        }
        Ok(Scope::new(receiver, env))
    }

    pub fn inspect(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|id| IdentId::get_name(*id))
            .collect::<Vec<_>>();
        format!(
            "{:?}({}) {{\n{}\n}}\n",
            self.name,
            params.join(", "),
            self.body
        )
    }
}

pub struct BuiltinMethod {
    pub func: BuiltinFunc,
    pub description: String,
}

impl fmt::Debug for BuiltinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinMethod {:?}", self.description)
    }
}

impl BuiltinMethod {
    pub fn new(func: BuiltinFunc, description: impl Into<String>) -> BuiltinRef {
        Rc::new(BuiltinMethod {
            func,
            description: description.into(),
        })
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

/// An entry of a method table: anything that can be invoked.
#[derive(Clone)]
pub enum MethodInfo {
    RubyFunc(MethodRef),
    BuiltinFunc(BuiltinRef),
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodInfo::RubyFunc(method) => write!(f, "RubyFunc {:?}", method),
            MethodInfo::BuiltinFunc(builtin) => write!(f, "BuiltinFunc {:?}", builtin.description),
        }
    }
}

impl PartialEq for MethodInfo {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MethodInfo::RubyFunc(lhs), MethodInfo::RubyFunc(rhs)) => Rc::ptr_eq(lhs, rhs),
            (MethodInfo::BuiltinFunc(lhs), MethodInfo::BuiltinFunc(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

impl MethodInfo {
    pub fn builtin(func: BuiltinFunc, description: impl Into<String>) -> Self {
        MethodInfo::BuiltinFunc(BuiltinMethod::new(func, description))
    }

    /// Callable held by `val`, if it is a `Method` or a `BuiltInMethod`.
    pub fn from_value(val: &Value) -> Option<Self> {
        match val {
            Value::Method(method) => Some(MethodInfo::RubyFunc(method.clone())),
            Value::BuiltInMethod(builtin) => Some(MethodInfo::BuiltinFunc(builtin.clone())),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            MethodInfo::RubyFunc(method) => Value::Method(method),
            MethodInfo::BuiltinFunc(builtin) => Value::BuiltInMethod(builtin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(args: &[Value]) -> Value {
        let mut acc = 0;
        for arg in args {
            match arg.as_integer() {
                Some(i) => acc += i,
                None => return ErrorObj::typeerr("Integer expected").into_value(),
            }
        }
        Value::Integer(acc)
    }

    fn adder(defining: &Scope) -> MethodRef {
        let loc = Loc(0, 0);
        let a = IdentId::get_id("a");
        let b = IdentId::get_id("b");
        let body = Node::new_binop(
            BinOp::Add,
            Node::new_identifier(a, loc),
            Node::new_identifier(b, loc),
        );
        MethodObj::new(IdentId::get_id("add"), vec![a, b], body, defining.clone())
    }

    #[test]
    fn call_scope_binds_params() {
        let defining = Scope::new(Value::Null, EnvRef::new());
        let method = adder(&defining);
        let scope = method
            .call_scope(Value::Integer(0), &[Value::Integer(1), Value::Integer(2)])
            .unwrap();
        assert_eq!(Value::Integer(0), scope.self_value);
        assert_eq!(Some(Value::Integer(1)), scope.env.get(IdentId::get_id("a")));
        assert_eq!(Some(Value::Integer(2)), scope.env.get(IdentId::get_id("b")));
        assert_eq!(Some(defining.env.clone()), scope.env.parent());
        assert!(defining.env.is_empty());
    }

    #[test]
    fn call_scopes_are_distinct() {
        let captured = IdentId::get_id("captured");
        let defining = Scope::new(Value::Null, EnvRef::new());
        defining.env.set(captured, Value::Integer(10));
        let method = adder(&defining);
        let args = [Value::Integer(1), Value::Integer(2)];
        let first = method.call_scope(Value::Null, &args).unwrap();
        let second = method.call_scope(Value::Null, &args).unwrap();
        assert_ne!(first.env, second.env);
        first.env.set(IdentId::get_id("a"), Value::Integer(100));
        assert_eq!(Some(Value::Integer(1)), second.env.get(IdentId::get_id("a")));
        assert_eq!(Some(Value::Integer(10)), first.env.get(captured));
        assert_eq!(Some(Value::Integer(10)), second.env.get(captured));
    }

    #[test]
    fn arity_mismatch() {
        let method = adder(&Scope::new(Value::Null, EnvRef::new()));
        let err = method.call_scope(Value::Null, &[Value::Integer(1)]).unwrap_err();
        assert_eq!(RuntimeErrKind::Argument, err.kind);
        assert_eq!("wrong number of arguments (given 1, expected 2)", err.message);
    }

    #[test]
    fn builtin() {
        let info = MethodInfo::builtin(sum, "sum(*ints)");
        let val = info.clone().into_value();
        assert_eq!(ValueType::BuiltInMethod, val.value_type());
        assert_eq!(Some(info.clone()), MethodInfo::from_value(&val));
        assert_eq!(None, MethodInfo::from_value(&Value::Integer(1)));
        match info {
            MethodInfo::BuiltinFunc(builtin) => {
                assert_eq!(
                    Value::Integer(6),
                    builtin.call(&[Value::Integer(1), Value::Integer(2), Value::Integer(3)])
                );
                assert!(builtin.call(&[Value::Null]).is_error());
            }
            _ => panic!("Expected BuiltinFunc"),
        }
    }

    #[test]
    fn inspect() {
        let method = adder(&Scope::new(Value::Null, EnvRef::new()));
        assert_eq!("add(a, b) {\na + b\n}\n", method.inspect());
        assert_eq!(
            "add(a, b) {\na + b\n}\n",
            Value::Method(method).inspect(&Globals::new())
        );
    }
}
