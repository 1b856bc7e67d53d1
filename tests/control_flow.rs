extern crate rooby;
use rooby::test::*;
use rooby::*;

#[test]
fn return_is_absorbed_at_call() {
    let program = vec![
        def("one", &[], vec![ret(int(1)), int(2)]),
        call("one", vec![]),
    ];
    eval_script(program, Value::Integer(1));
}

#[test]
fn body_evaluates_to_returning() {
    let mut eval = Evaluator::new();
    let scope = eval.globals.main_scope();
    let body = block(vec![ret(int(1)), int(2)]);
    let val = eval.eval_node(&body, &scope);
    assert_eq!(Flow::Returning(Value::Integer(1)), Flow::from_value(val));
}

#[test]
fn return_skips_remaining_statements() {
    let program = vec![
        class(
            "Probe",
            None,
            vec![
                def(
                    "run",
                    &[],
                    vec![ret(int(1)), assign(ivar("hit"), boolean(true)), int(3)],
                ),
                def("hit", &[], vec![ivar("hit")]),
            ],
        ),
        assign(var("p"), send(constant("Probe"), "new", vec![])),
        if_(
            binop(BinOp::Eq, send(var("p"), "run", vec![]), int(1)),
            send(var("p"), "hit", vec![]),
            string("run did not return 1"),
        ),
    ];
    eval_script(program, Value::Null);
}

#[test]
fn return_from_nested_if() {
    let program = vec![
        def(
            "sign",
            &["n"],
            vec![
                if_(
                    binop(BinOp::Lt, var("n"), int(0)),
                    block(vec![ret(string("negative"))]),
                    nil(),
                ),
                string("positive"),
            ],
        ),
        binop(
            BinOp::Add,
            call("sign", vec![int(-3)]),
            call("sign", vec![int(3)]),
        ),
    ];
    eval_script(program, Value::string("negativepositive"));
}

#[test]
fn return_only_leaves_innermost_method() {
    let program = vec![
        def("inner", &[], vec![ret(int(1)), int(2)]),
        def(
            "outer",
            &[],
            vec![assign(var("x"), call("inner", vec![])), binop(BinOp::Add, var("x"), int(10))],
        ),
        call("outer", vec![]),
    ];
    eval_script(program, Value::Integer(11));
}

#[test]
fn error_body_evaluates_to_erroring() {
    let mut eval = Evaluator::new();
    let scope = eval.globals.main_scope();
    let body = block(vec![raise("boom"), int(2)]);
    let val = eval.eval_node(&body, &scope);
    match Flow::from_value(val) {
        Flow::Erroring(err) => {
            assert_eq!(RuntimeErrKind::Runtime, err.kind);
            assert_eq!("boom", err.message);
        }
        flow => panic!("Expected Erroring Got:{:?}", flow),
    }
}

#[test]
fn error_unwinds_through_calls() {
    let program = vec![
        def("inner", &[], vec![raise("boom"), int(2)]),
        def(
            "outer",
            &[],
            vec![assign(var("x"), call("inner", vec![])), int(3)],
        ),
        call("outer", vec![]),
        int(4),
    ];
    let err = assert_error(program, RuntimeErrKind::Runtime);
    assert_eq!("boom", err.message);
}

#[test]
fn error_halts_unit_only() {
    let mut eval = Evaluator::new();
    let unit = block(vec![
        def("fail", &[], vec![raise("boom")]),
        call("fail", vec![]),
        assign(var("after"), int(1)),
    ]);
    let err = eval.run(&unit).unwrap_err();
    assert_eq!(RuntimeErrKind::Runtime, err.kind);
    let err = eval.run(&var("after")).unwrap_err();
    assert_eq!(RuntimeErrKind::Name, err.kind);
    assert_eq!(Ok(Value::Integer(5)), eval.run(&int(5)));
}

#[test]
fn error_in_arguments_skips_call() {
    let program = vec![
        def("f", &["x"], vec![var("x")]),
        call("f", vec![raise_value(string("arg"))]),
    ];
    let err = assert_error(program, RuntimeErrKind::Runtime);
    assert_eq!("arg", err.message);
}

#[test]
fn error_in_initialize() {
    let program = vec![
        class(
            "Broken",
            None,
            vec![def("initialize", &[], vec![raise("no way")])],
        ),
        send(constant("Broken"), "new", vec![]),
    ];
    let err = assert_error(program, RuntimeErrKind::Runtime);
    assert_eq!("no way", err.message);
}

#[test]
fn return_at_top_level() {
    eval_script(vec![ret(int(5)), int(6)], Value::Integer(5));
}

#[test]
fn return_in_class_body_ends_unit() {
    let program = vec![
        class("Foo", None, vec![ret(int(7)), def("never", &[], vec![])]),
        int(8),
    ];
    let (eval, res) = run(program);
    assert_eq!(Ok(Value::Integer(7)), res);
    let class = eval.globals.main_env().get(id("Foo")).unwrap();
    let class = class.as_class().unwrap();
    assert_eq!(
        None,
        eval.globals.class_table[class].get_method(id("never"), MethodKind::Instance)
    );
}

#[test]
fn unwinding_restores_call_depth() {
    let mut eval = Evaluator::new();
    let unit = block(vec![
        def("inner", &[], vec![raise("boom")]),
        def("outer", &[], vec![call("inner", vec![])]),
        def("pair", &["a", "b"], vec![var("a")]),
    ]);
    eval.run(&unit).unwrap();
    assert!(eval.run(&call("outer", vec![])).is_err());
    assert_eq!(0, eval.depth());
    assert!(eval.run(&call("pair", vec![int(1)])).is_err());
    assert_eq!(0, eval.depth());
    assert_eq!(Ok(Value::Integer(1)), eval.run(&call("pair", vec![int(1), int(2)])));
}
