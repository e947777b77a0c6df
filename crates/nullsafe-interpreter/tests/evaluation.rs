//! Evaluation of whole units: classes, methods and the runtime built-ins.

use nullsafe_interpreter::{EvalError, Interpreter, Value};
use nullsafe_runtime::RuntimeFailure;
use nullsafe_syntax::ast::{BinaryOp, Decl};
use nullsafe_syntax::build::AstBuilder;

#[test]
fn methods_see_self() {
    let b = AstBuilder::new();
    let name = b.public_fn("name", vec![], None, b.field(b.ident("self"), "name"));
    let class = b.class("Job", vec![("name", b.ty("String"))], vec![name]);
    let main = b.public_fn(
        "main",
        vec![],
        None,
        b.method(
            b.construct("Job", vec![("name", b.string("build"))]),
            "name",
            vec![],
        ),
    );
    let unit = b.unit("app", vec![class, Decl::Fn(main)]);
    let interner = b.into_interner();

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    assert_eq!(interp.call("main", vec![]).unwrap(), Value::str("build"));
}

#[test]
fn early_return() {
    let b = AstBuilder::new();
    let body = b.block(
        vec![
            b.stmt(b.if_else(
                b.binary(b.ident("n"), BinaryOp::Lt, b.int(0)),
                b.block(vec![b.ret(Some(b.int(0)))], None),
                None,
            )),
            b.ret(Some(b.ident("n"))),
        ],
        None,
    );
    let clamp = b.public_fn("clamp", vec![b.param("n", b.ty("Int"))], None, body);
    let unit = b.unit("app", vec![Decl::Fn(clamp)]);
    let interner = b.into_interner();

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    assert_eq!(interp.call("clamp", vec![Value::Int(-4)]).unwrap(), Value::Int(0));
    assert_eq!(interp.call("clamp", vec![Value::Int(7)]).unwrap(), Value::Int(7));
}

#[test]
fn safe_array_reads_are_optional() {
    let b = AstBuilder::new();
    let array = b.call(
        b.path(&["nullsafe", "SafeArray", "from"]),
        vec![b.array(vec![b.nil(), b.int(2)])],
    );
    let stored_nil = b.index(array.clone(), b.int(0));
    let missing = b.method(array.clone(), "get", vec![b.int(5)]);
    let length = b.method(array, "length", vec![]);
    let interner = b.into_interner();

    let mut interp = Interpreter::new(&interner);
    assert_eq!(
        interp.eval_expr(&stored_nil).unwrap(),
        Value::Optional(Some(Box::new(Value::Nil)))
    );
    assert!(matches!(interp.eval_expr(&missing).unwrap(), Value::Optional(None)));
    assert_eq!(interp.eval_expr(&length).unwrap(), Value::Int(2));
}

#[test]
fn stored_nil_read_equals_itself() {
    let b = AstBuilder::new();
    let array = b.call(
        b.path(&["nullsafe", "SafeArray", "from"]),
        vec![b.array(vec![b.int(1), b.nil()])],
    );
    let body = b.block(
        vec![b.let_stmt("xs", None, array)],
        Some(b.eq(b.index(b.ident("xs"), b.int(1)), b.index(b.ident("xs"), b.int(1)))),
    );
    let interner = b.into_interner();

    let mut interp = Interpreter::new(&interner);
    assert_eq!(interp.eval_expr(&body).unwrap(), Value::Bool(true));
}

#[test]
fn or_and_sure_builtins() {
    let b = AstBuilder::new();
    let or_nil = b.call(b.path(&["nullsafe", "or"]), vec![b.nil(), b.int(9)]);
    let or_value = b.call(b.path(&["nullsafe", "or"]), vec![b.int(1), b.int(9)]);
    let sure_nil = b.call(b.path(&["nullsafe", "sure"]), vec![b.nil()]);
    let interner = b.into_interner();

    let mut interp = Interpreter::new(&interner);
    assert_eq!(interp.eval_expr(&or_nil).unwrap(), Value::Int(9));
    assert_eq!(interp.eval_expr(&or_value).unwrap(), Value::Int(1));
    assert!(matches!(
        interp.eval_expr(&sure_nil),
        Err(EvalError::Runtime(RuntimeFailure::NullPointer(_)))
    ));
}

#[test]
fn guard_failure_reports_call_site() {
    let b = AstBuilder::new();
    let fail = b.call(
        b.path(&["nullsafe", "guard_failure"]),
        vec![b.string("s"), b.string("app.util.job")],
    );
    let job = b.public_fn("job", vec![b.param("s", b.ty("String"))], None, fail);
    let call = b.call_named("job", vec![b.nil()]);
    let call_span = {
        use nullsafe_syntax::Spanned;
        call.span()
    };
    let main = b.public_fn("main", vec![], None, call);
    let unit = b.unit("app.util", vec![Decl::Fn(job), Decl::Fn(main)]);
    let interner = b.into_interner();

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    let err = interp.call("main", vec![]).unwrap_err();
    let failure = err.as_guard_failure().expect("guard failure");
    assert_eq!(failure.parameter, "s");
    assert_eq!(failure.function, "app.util.job");
    let site = failure.call_site.as_ref().expect("call site");
    assert_eq!(site.column as usize, call_span.col);
}

#[test]
fn unknown_function() {
    let b = AstBuilder::new();
    let expr = b.call_named("missing", vec![]);
    let interner = b.into_interner();
    let mut interp = Interpreter::new(&interner);
    assert!(matches!(
        interp.eval_expr(&expr),
        Err(EvalError::UnknownFunction { name, .. }) if name == "missing"
    ));
}
