use crate::*;
use smallvec::SmallVec;

pub type Args = SmallVec<[Value; 4]>;

/// Maximum number of nested method calls.
pub const STACK_LIMIT: usize = 10_000;

/// Run `f`, growing the native stack first if less than `RED_ZONE` is left.
#[inline]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const RED_ZONE: usize = 128 * 1024;
    const STACK_PER_RECURSION: usize = 1024 * 1024;
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Evaluate to `$val`, or return it from the enclosing function if it is a
/// control signal.
macro_rules! try_value {
    ($val:expr) => {{
        let val = $val;
        if val.is_signal() {
            return val;
        }
        val
    }};
}

/// Tree-walking evaluator on top of the object model.
///
/// Every evaluation step returns a `Value`. `ReturnValue` and `Error` are
/// propagated upward with `try_value!` and consumed only at method-call
/// boundaries (`invoke`) and at the top level (`run`).
#[derive(Debug, Default)]
pub struct Evaluator {
    pub globals: Globals,
    /// Number of method calls currently in progress.
    depth: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            globals: Globals::new(),
            depth: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn inspect(&self, val: &Value) -> String {
        val.inspect(&self.globals)
    }

    /// Evaluate one top-level unit in the main scope.
    ///
    /// An error surfacing here is handed to the caller; the evaluator stays
    /// usable for the next unit.
    pub fn run(&mut self, node: &Node) -> Result<Value, ErrorObj> {
        let scope = self.globals.main_scope();
        let res = Flow::from_value(self.eval_node(node, &scope)).finish();
        #[cfg(feature = "verbose")]
        {
            if let Err(err) = &res {
                err.show_err();
            }
        }
        res
    }

    /// Define a class from the host side and bind it as a top-level constant.
    pub fn define_class(&mut self, name: &str, superclass: Option<ClassRef>) -> ClassRef {
        let id = IdentId::get_id(name);
        let main_env = self.globals.main_env().clone();
        let class = self.globals.class_table.new_class(id, superclass, &main_env);
        main_env.set(id, Value::Class(class));
        class
    }

    /// Register a native method in `class`.
    pub fn define_builtin(
        &mut self,
        class: ClassRef,
        kind: MethodKind,
        name: &str,
        func: BuiltinFunc,
    ) -> Option<MethodInfo> {
        let description = format!("<BuiltinMethod:{}>", name);
        self.globals.class_table[class].define_method(
            kind,
            IdentId::get_id(name),
            MethodInfo::builtin(func, description),
        )
    }

    /// Register a native top-level function.
    pub fn define_global_builtin(&mut self, name: &str, func: BuiltinFunc) {
        let description = format!("<BuiltinMethod:{}>", name);
        self.globals.main_env().set(
            IdentId::get_id(name),
            MethodInfo::builtin(func, description).into_value(),
        );
    }
}

impl Evaluator {
    pub fn eval_node(&mut self, node: &Node, scope: &Scope) -> Value {
        let loc = node.loc();
        match &node.kind {
            NodeKind::SelfValue => scope.self_value.clone(),
            NodeKind::Nil => Value::Null,
            NodeKind::Integer(num) => Value::Integer(*num),
            NodeKind::Bool(b) => Value::bool(*b),
            NodeKind::String(s) => Value::string(s.clone()),
            NodeKind::Ident(id) => match scope.env.get(*id) {
                Some(val) => val,
                None => ErrorObj::name(format!("undefined local variable `{:?}'", id))
                    .with_loc(loc)
                    .into_value(),
            },
            NodeKind::Const(id) => match scope.env.get(*id) {
                Some(val) => val,
                None => ErrorObj::name(format!("uninitialized constant {:?}", id))
                    .with_loc(loc)
                    .into_value(),
            },
            NodeKind::InstanceVar(id) => match &scope.self_value {
                Value::BaseObject(instance) => self.globals.instance_table[*instance].get_var(*id),
                _ => self.error_ivar(&scope.self_value, loc),
            },
            NodeKind::BinOp(op, lhs, rhs) => {
                let lhs = try_value!(self.eval_node(lhs, scope));
                let rhs = try_value!(self.eval_node(rhs, scope));
                self.eval_binop(*op, lhs, rhs, loc)
            }
            NodeKind::Assign(lhs, rhs) => {
                let rhs = try_value!(self.eval_node(rhs, scope));
                self.eval_assign(lhs, rhs, scope)
            }
            NodeKind::CompStmt(nodes) => {
                eval_sequence(nodes, |node| self.eval_node(node, scope)).into_value()
            }
            NodeKind::If { cond, then_, else_ } => {
                let cond = try_value!(self.eval_node(cond, scope));
                if cond.to_bool() {
                    self.eval_node(then_, scope)
                } else {
                    self.eval_node(else_, scope)
                }
            }
            NodeKind::Return(val) => {
                let val = try_value!(self.eval_node(val, scope));
                Value::return_value(val)
            }
            NodeKind::Raise(message) => self.eval_raise(message, scope, loc),
            NodeKind::MethodDef(id, params, body) => {
                let method = MethodObj::new(*id, params.clone(), (**body).clone(), scope.clone());
                self.define_method(method, scope)
            }
            NodeKind::ClassMethodDef(id, params, body) => {
                self.eval_class_method_def(*id, params, body, scope, loc)
            }
            NodeKind::ClassDef {
                id,
                superclass,
                body,
            } => self.eval_class_def(*id, superclass.as_deref(), body, scope, loc),
            NodeKind::Send {
                receiver,
                method,
                args,
            } => self.eval_send(receiver.as_deref(), *method, args, scope, loc),
        }
    }

    #[inline(never)]
    fn eval_raise(&mut self, message: &Node, scope: &Scope, loc: Loc) -> Value {
        match try_value!(self.eval_node(message, scope)) {
            Value::String(message) => ErrorObj::runtime(message).with_loc(loc).into_value(),
            val => ErrorObj::typeerr(format!(
                "exception message must be a String ({} given)",
                val.value_type()
            ))
            .with_loc(loc)
            .into_value(),
        }
    }

    #[inline(never)]
    fn eval_class_method_def(
        &mut self,
        id: IdentId,
        params: &[IdentId],
        body: &Node,
        scope: &Scope,
        loc: Loc,
    ) -> Value {
        match scope.self_value {
            Value::Class(class) => {
                let method = MethodObj::new(id, params.to_vec(), body.clone(), scope.clone());
                self.globals.class_table[class]
                    .define_class_method(id, MethodInfo::RubyFunc(method.clone()));
                Value::Method(method)
            }
            _ => ErrorObj::typeerr(format!(
                "can't define class method `{:?}' for {}",
                id,
                self.inspect(&scope.self_value)
            ))
            .with_loc(loc)
            .into_value(),
        }
    }

    #[inline(never)]
    fn error_ivar(&self, self_value: &Value, loc: Loc) -> Value {
        ErrorObj::typeerr(format!(
            "instance variables are not available for {}",
            self.inspect(self_value)
        ))
        .with_loc(loc)
        .into_value()
    }

    fn eval_assign(&mut self, lhs: &Node, rhs: Value, scope: &Scope) -> Value {
        match &lhs.kind {
            NodeKind::Ident(id) | NodeKind::Const(id) => {
                scope.env.set(*id, rhs.clone());
            }
            NodeKind::InstanceVar(id) => match &scope.self_value {
                Value::BaseObject(instance) => {
                    self.globals.instance_table[*instance].set_var(*id, rhs.clone());
                }
                _ => return self.error_ivar(&scope.self_value, lhs.loc()),
            },
            _ => {
                return ErrorObj::typeerr(format!("can't assign to {}", lhs))
                    .with_loc(lhs.loc())
                    .into_value()
            }
        };
        rhs
    }

    fn eval_binop(&self, op: BinOp, lhs: Value, rhs: Value, loc: Loc) -> Value {
        match (op, &lhs, &rhs) {
            (BinOp::Add, Value::Integer(l), Value::Integer(r)) => Value::Integer(l.wrapping_add(*r)),
            (BinOp::Add, Value::String(l), Value::String(r)) => Value::string(format!("{}{}", l, r)),
            (BinOp::Sub, Value::Integer(l), Value::Integer(r)) => Value::Integer(l.wrapping_sub(*r)),
            (BinOp::Mul, Value::Integer(l), Value::Integer(r)) => Value::Integer(l.wrapping_mul(*r)),
            (BinOp::Gt, Value::Integer(l), Value::Integer(r)) => Value::bool(l > r),
            (BinOp::Lt, Value::Integer(l), Value::Integer(r)) => Value::bool(l < r),
            (BinOp::Eq, _, _) => Value::bool(lhs == rhs),
            (BinOp::Ne, _, _) => Value::bool(lhs != rhs),
            _ => ErrorObj::typeerr(format!(
                "`{}' can't be applied to {} and {}",
                op.as_str(),
                lhs.value_type(),
                rhs.value_type()
            ))
            .with_loc(loc)
            .into_value(),
        }
    }

    /// `def` registers the method where `self` says: on a class, on the
    /// class of an instance, or as a function in the current environment.
    fn define_method(&mut self, method: MethodRef, scope: &Scope) -> Value {
        let id = method.name;
        let info = MethodInfo::RubyFunc(method.clone());
        match &scope.self_value {
            Value::Class(class) => {
                self.globals.class_table[*class].define_instance_method(id, info);
            }
            Value::BaseObject(instance) => {
                let class = self.globals.class_of(*instance);
                self.globals.class_table[class].define_instance_method(id, info);
            }
            _ => {
                scope.env.set(id, info.into_value());
            }
        };
        Value::Method(method)
    }

    #[inline(never)]
    fn eval_class_def(
        &mut self,
        id: IdentId,
        superclass: Option<&Node>,
        body: &Node,
        scope: &Scope,
        loc: Loc,
    ) -> Value {
        let superclass = match superclass {
            None => None,
            Some(node) => match try_value!(self.eval_node(node, scope)) {
                Value::Class(class) => Some(class),
                val => {
                    return ErrorObj::typeerr(format!(
                        "superclass must be a Class ({} given)",
                        val.value_type()
                    ))
                    .with_loc(node.loc())
                    .into_value()
                }
            },
        };
        let class = match scope.env.get(id) {
            None => {
                let class = self.globals.class_table.new_class(id, superclass, &scope.env);
                scope.env.set(id, Value::Class(class));
                class
            }
            Some(Value::Class(class)) => {
                if superclass.is_some() && superclass != self.globals.class_table[class].superclass()
                {
                    return ErrorObj::typeerr(format!("superclass mismatch for class {:?}", id))
                        .with_loc(loc)
                        .into_value();
                }
                class
            }
            Some(_) => {
                return ErrorObj::typeerr(format!("{:?} is not a class", id))
                    .with_loc(loc)
                    .into_value()
            }
        };
        let class_scope = self.globals.class_table[class].scope.clone();
        try_value!(self.eval_node(body, &class_scope));
        Value::Class(class)
    }

    #[inline(never)]
    fn eval_send(
        &mut self,
        receiver: Option<&Node>,
        method: IdentId,
        args: &[Node],
        scope: &Scope,
        loc: Loc,
    ) -> Value {
        let receiver_val = match receiver {
            Some(receiver) => try_value!(self.eval_node(receiver, scope)),
            None => scope.self_value.clone(),
        };
        let mut args_val = Args::new();
        for arg in args {
            args_val.push(try_value!(self.eval_node(arg, scope)));
        }
        if let Value::Class(class) = receiver_val {
            if method == IdentId::NEW
                && self
                    .globals
                    .class_table
                    .search_method(class, method, MethodKind::Class)
                    .is_none()
            {
                return self.instantiate(class, &args_val, loc);
            }
        }
        let info = match self.find_method(&receiver_val, method, receiver.is_none(), scope) {
            Ok(info) => info,
            Err(err) => return err.with_loc(loc).into_value(),
        };
        self.invoke(&info, receiver_val, &args_val, loc)
    }

    /// Find the callable for a call of `method` on `receiver`.
    ///
    /// Objects and classes resolve through their class's instance or class
    /// method tables. A call without an explicit receiver may also reach a
    /// callable bound in the lexical environment (a top-level function).
    pub fn find_method(
        &self,
        receiver: &Value,
        method: IdentId,
        fcall: bool,
        scope: &Scope,
    ) -> Result<MethodInfo, ErrorObj> {
        let class_table = &self.globals.class_table;
        let found = match receiver {
            Value::Class(class) => {
                class_table.get_method_or_nomethod(*class, method, MethodKind::Class)
            }
            Value::BaseObject(instance) => class_table.get_method_or_nomethod(
                self.globals.class_of(*instance),
                method,
                MethodKind::Instance,
            ),
            _ => Err(ErrorObj::undefined_method(
                method,
                format!("{}:{}", self.inspect(receiver), receiver.value_type()),
            )),
        };
        match found {
            Err(err) if fcall => match scope.env.get(method) {
                Some(val) => MethodInfo::from_value(&val).ok_or(err),
                None => Err(err),
            },
            found => found,
        }
    }

    /// Call `info` with `receiver` as `self`.
    ///
    /// This is the method-call boundary: a `ReturnValue` coming out of the
    /// body is unwrapped here, an `Error` is passed on. More than
    /// `STACK_LIMIT` nested calls give a `SystemStackError`.
    pub fn invoke(&mut self, info: &MethodInfo, receiver: Value, args: &[Value], loc: Loc) -> Value {
        if self.depth >= STACK_LIMIT {
            return ErrorObj::stack_overflow().with_loc(loc).into_value();
        }
        self.depth += 1;
        let res = ensure_sufficient_stack(|| self.call_body(info, receiver, args, loc));
        self.depth -= 1;
        let res = match Flow::from_value(res) {
            Flow::Erroring(err) => err.with_loc(loc).into_value(),
            flow => flow.unwind_call(),
        };
        #[cfg(feature = "trace")]
        println!("<+++ {}", self.inspect(&res));
        res
    }

    #[inline(never)]
    fn call_body(&mut self, info: &MethodInfo, receiver: Value, args: &[Value], loc: Loc) -> Value {
        match info {
            MethodInfo::RubyFunc(method) => {
                #[cfg(feature = "trace")]
                println!(
                    "+++> Method self:{} name:{:?}",
                    self.inspect(&receiver),
                    method.name
                );
                let scope = match method.call_scope(receiver, args) {
                    Ok(scope) => scope,
                    Err(err) => return err.with_loc(loc).into_value(),
                };
                self.eval_node(&method.body, &scope)
            }
            MethodInfo::BuiltinFunc(builtin) => {
                #[cfg(feature = "trace")]
                println!(
                    "+++> BuiltinFunc self:{} name:{}",
                    self.inspect(&receiver),
                    builtin.description
                );
                builtin.call(args)
            }
        }
    }

    /// `Klass.new(args)` when the class does not define its own `new`.
    fn instantiate(&mut self, class: ClassRef, args: &[Value], loc: Loc) -> Value {
        let obj = self.globals.new_instance(class);
        match self
            .globals
            .class_table
            .search_method(class, IdentId::INITIALIZE, MethodKind::Instance)
        {
            Some(info) => {
                try_value!(self.invoke(&info, obj.clone(), args, loc));
            }
            None if !args.is_empty() => {
                return ErrorObj::wrong_arguments(args.len(), 0)
                    .with_loc(loc)
                    .into_value()
            }
            None => {}
        };
        obj
    }
}
