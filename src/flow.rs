use crate::*;

/// State of evaluating a sequence of statements in one body.
///
/// ```text
///   Normal --ReturnValue--> Returning --(call boundary)--> Normal
///   Normal --Error-------> Erroring  --(call boundary)--> Erroring ... top level
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal(Value),
    Returning(Value),
    Erroring(ErrorObj),
}

impl Flow {
    pub fn from_value(val: Value) -> Self {
        match val {
            Value::ReturnValue(val) => Flow::Returning(*val),
            Value::Error(err) => Flow::Erroring(*err),
            val => Flow::Normal(val),
        }
    }

    /// Remaining statements of the current body must be skipped.
    pub fn is_unwinding(&self) -> bool {
        !matches!(self, Flow::Normal(_))
    }

    /// Hand the state to the enclosing evaluation step unchanged.
    pub fn into_value(self) -> Value {
        match self {
            Flow::Normal(val) => val,
            Flow::Returning(val) => Value::return_value(val),
            Flow::Erroring(err) => err.into_value(),
        }
    }

    /// Leave a method-call boundary. A return is absorbed into its plain
    /// value; an error keeps unwinding.
    pub fn unwind_call(self) -> Value {
        match self {
            Flow::Normal(val) | Flow::Returning(val) => val,
            Flow::Erroring(err) => err.into_value(),
        }
    }

    /// Leave the top level. A stray return is treated as a normal value.
    pub fn finish(self) -> Result<Value, ErrorObj> {
        match self {
            Flow::Normal(val) | Flow::Returning(val) => Ok(val),
            Flow::Erroring(err) => Err(err),
        }
    }
}

/// Evaluate `stmts` in order, stopping at the first control signal.
///
/// The value of an empty sequence is `null`; otherwise it is the value of
/// the last statement evaluated.
pub fn eval_sequence<T>(
    stmts: impl IntoIterator<Item = T>,
    mut eval: impl FnMut(T) -> Value,
) -> Flow {
    let mut flow = Flow::Normal(Value::Null);
    for stmt in stmts {
        flow = Flow::from_value(eval(stmt));
        if flow.is_unwinding() {
            break;
        }
    }
    flow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(stmts: Vec<Value>) -> (Flow, usize) {
        let mut evaluated = 0;
        let flow = eval_sequence(stmts, |val| {
            evaluated += 1;
            val
        });
        (flow, evaluated)
    }

    #[test]
    fn normal() {
        let (flow, evaluated) = run(vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(Flow::Normal(Value::Integer(2)), flow);
        assert_eq!(2, evaluated);
        assert_eq!(Flow::Normal(Value::Null), run(vec![]).0);
    }

    #[test]
    fn return_skips_rest() {
        let (flow, evaluated) = run(vec![
            Value::return_value(Value::Integer(1)),
            Value::Integer(2),
        ]);
        assert_eq!(Flow::Returning(Value::Integer(1)), flow);
        assert_eq!(1, evaluated);
        assert_eq!(Value::Integer(1), flow.unwind_call());
    }

    #[test]
    fn error_skips_rest() {
        let (flow, evaluated) = run(vec![
            Value::Integer(0),
            ErrorObj::runtime("boom").into_value(),
            Value::Integer(2),
        ]);
        assert_eq!(Flow::Erroring(ErrorObj::runtime("boom")), flow);
        assert_eq!(2, evaluated);
    }

    #[test]
    fn error_crosses_call_boundaries() {
        let inner = Flow::Erroring(ErrorObj::runtime("boom")).unwind_call();
        let (outer, _) = run(vec![inner, Value::Integer(2)]);
        let outer = outer.unwind_call();
        assert_eq!(ErrorObj::runtime("boom").into_value(), outer);
        assert_eq!(
            Err(ErrorObj::runtime("boom")),
            Flow::from_value(outer).finish()
        );
    }

    #[test]
    fn return_at_top_level() {
        let (flow, _) = run(vec![Value::return_value(Value::Integer(3))]);
        assert_eq!(Ok(Value::Integer(3)), flow.finish());
    }

    #[test]
    fn nested_bodies_propagate() {
        // An `if` branch returning inside a method body: the inner body hands
        // the signal up unchanged, the method boundary absorbs it.
        let (inner, _) = run(vec![Value::return_value(Value::Integer(5))]);
        let (outer, evaluated) = run(vec![inner.into_value(), Value::Integer(9)]);
        assert_eq!(1, evaluated);
        assert_eq!(Value::Integer(5), outer.unwind_call());
    }
}
