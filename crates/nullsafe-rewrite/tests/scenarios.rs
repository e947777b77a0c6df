//! End-to-end behavior: rewrite a unit, then run it.

use nullsafe_interpreter::{EvalError, Interpreter, Value};
use nullsafe_rewrite::{ActivationSet, Driver, RewriteError};
use nullsafe_syntax::ast::{CompilationUnit, Decl};
use nullsafe_syntax::build::AstBuilder;
use nullsafe_syntax::StringInterner;
use std::cell::Cell;
use std::rc::Rc;

fn activations(directives: &[&str]) -> ActivationSet {
    ActivationSet::builder()
        .directives(directives.iter().copied())
        .unwrap()
        .build()
        .unwrap()
}

fn rewrite(unit: &mut CompilationUnit, interner: &mut StringInterner, directives: &[&str]) {
    let set = activations(directives);
    Driver::new(&set).rewrite_unit(unit, interner).unwrap();
}

/// Registers `name()` as a native that counts its calls and returns `value`.
fn counting(interp: &mut Interpreter<'_>, name: &str, value: Value) -> Rc<Cell<u32>> {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    interp.register_native(name, move |_| {
        counter.set(counter.get() + 1);
        Ok(value.clone())
    });
    calls
}

/// `pub fn get() { source()?.name }` in package `app`
fn safe_field_unit(b: &AstBuilder) -> CompilationUnit {
    let body = b.safe_field(b.call_named("source", vec![]), "name");
    let get = b.public_fn("get", vec![], None, body);
    b.unit("app", vec![Decl::Fn(get)])
}

#[test]
fn navigation_yields_nil_for_nil_receiver() {
    let b = AstBuilder::new();
    let mut unit = safe_field_unit(&b);
    let mut interner = b.into_interner();
    rewrite(&mut unit, &mut interner, &["navigation=app"]);

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    let calls = counting(&mut interp, "source", Value::Nil);

    assert_eq!(interp.call("get", vec![]).unwrap(), Value::Nil);
    assert_eq!(calls.get(), 1);
}

#[test]
fn navigation_reads_field_of_present_receiver_once() {
    let b = AstBuilder::new();
    let mut unit = safe_field_unit(&b);
    // `source()` returns a `Job { name: "build" }` built by a helper function
    let make = b.public_fn(
        "make",
        vec![],
        None,
        b.construct("Job", vec![("name", b.string("build"))]),
    );
    unit.decls.push(Decl::Fn(make));
    let mut interner = b.into_interner();
    rewrite(&mut unit, &mut interner, &["navigation=app"]);

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    let job = interp.call("make", vec![]).unwrap();
    let calls = counting(&mut interp, "source", job);

    assert_eq!(interp.call("get", vec![]).unwrap(), Value::str("build"));
    assert_eq!(calls.get(), 1);
}

#[test]
fn chain_short_circuits_every_link() {
    let b = AstBuilder::new();
    // a?.m(side())?.c
    let chain = b.safe_field(
        b.safe_method(b.ident("a"), "m", vec![b.call_named("side", vec![])]),
        "c",
    );
    let f = b.public_fn("f", vec![b.param("a", b.optional(b.ty("Job")))], None, chain);
    let mut unit = b.unit("app", vec![Decl::Fn(f)]);
    let mut interner = b.into_interner();
    rewrite(&mut unit, &mut interner, &["navigation=app"]);

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    let side = counting(&mut interp, "side", Value::Int(0));

    assert_eq!(interp.call("f", vec![Value::Nil]).unwrap(), Value::Nil);
    assert_eq!(side.get(), 0);
}

#[test]
fn unrewritten_access_on_nil_fails() {
    let b = AstBuilder::new();
    let body = b.field(b.ident("a"), "name");
    let f = b.public_fn("f", vec![b.param("a", b.optional(b.ty("Job")))], None, body);
    let mut unit = b.unit("app", vec![Decl::Fn(f)]);
    let mut interner = b.into_interner();
    rewrite(&mut unit, &mut interner, &["all=app"]);

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    assert!(matches!(
        interp.call("f", vec![Value::Nil]),
        Err(EvalError::NullReference { .. })
    ));
}

#[test]
fn navigation_temporary_never_captures_user_binding() {
    let b = AstBuilder::new();
    let id = b.public_fn("id", vec![b.param("x", b.ty("Int"))], None, b.ident("x"));
    let class = b.class("Job", vec![], vec![id]);
    let make = b.public_fn("make", vec![], None, b.construct("Job", vec![]));
    // the user's parameter is spelled like the first generated temporary
    let body = b.safe_method(b.ident("a"), "id", vec![b.ident("__nullsafe_nav0")]);
    let f = b.public_fn(
        "f",
        vec![
            b.param("a", b.optional(b.ty("Job"))),
            b.param("__nullsafe_nav0", b.ty("Int")),
        ],
        None,
        body,
    );
    let mut unit = b.unit("app", vec![class, Decl::Fn(make), Decl::Fn(f)]);
    let mut interner = b.into_interner();
    rewrite(&mut unit, &mut interner, &["navigation=app"]);

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    let job = interp.call("make", vec![]).unwrap();
    assert_eq!(interp.call("f", vec![job, Value::Int(7)]).unwrap(), Value::Int(7));
    assert_eq!(interp.call("f", vec![Value::Nil, Value::Int(7)]).unwrap(), Value::Nil);
}

/// `app.util.job(s: String)` whose first statement calls `touch()`
fn job_unit(b: &AstBuilder) -> CompilationUnit {
    let body = b.block(
        vec![b.stmt(b.call_named("touch", vec![]))],
        Some(b.ident("s")),
    );
    let job = b.public_fn("job", vec![b.param("s", b.ty("String"))], Some(b.ty("String")), body);
    let call = b.call_named("job", vec![b.nil()]);
    let main = b.public_fn("main", vec![], None, call);
    b.unit("app.util", vec![Decl::Fn(job), Decl::Fn(main)])
}

#[test]
fn guard_fires_before_body() {
    let b = AstBuilder::new();
    let mut unit = job_unit(&b);
    let mut interner = b.into_interner();
    rewrite(&mut unit, &mut interner, &["api=app.*"]);

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    let touched = counting(&mut interp, "touch", Value::Unit);

    let err = interp.call("job", vec![Value::Nil]).unwrap_err();
    let failure = err.as_guard_failure().expect("guard failure");
    assert_eq!(failure.parameter, "s");
    assert_eq!(failure.function, "app.util.job");
    assert_eq!(touched.get(), 0);

    assert_eq!(interp.call("job", vec![Value::str("x")]).unwrap(), Value::str("x"));
    assert_eq!(touched.get(), 1);
}

#[test]
fn guard_failure_names_call_site_in_host_code() {
    let b = AstBuilder::new();
    let mut unit = job_unit(&b);
    let mut interner = b.into_interner();
    rewrite(&mut unit, &mut interner, &["api=app.*"]);

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    counting(&mut interp, "touch", Value::Unit);

    let err = interp.call("main", vec![]).unwrap_err();
    let failure = err.as_guard_failure().expect("guard failure");
    assert!(failure.call_site.is_some());
    assert!(err.to_string().contains("`s` of `app.util.job`"), "{err}");
}

#[test]
fn without_guard_nil_reaches_body() {
    let b = AstBuilder::new();
    let mut unit = job_unit(&b);
    let mut interner = b.into_interner();
    rewrite(&mut unit, &mut interner, &["navigation=app.*"]);

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    let touched = counting(&mut interp, "touch", Value::Unit);

    assert_eq!(interp.call("job", vec![Value::Nil]).unwrap(), Value::Nil);
    assert_eq!(touched.get(), 1);
}

#[test]
fn private_functions_are_not_guarded() {
    let b = AstBuilder::new();
    let helper = b.private_fn("helper", vec![b.param("s", b.ty("String"))], None, b.ident("s"));
    let mut unit = b.unit("app", vec![Decl::Fn(helper)]);
    let before = unit.clone();
    let mut interner = b.into_interner();
    rewrite(&mut unit, &mut interner, &["api=app"]);
    assert_eq!(unit, before);
}

#[test]
fn methods_are_guarded_under_their_type_path() {
    let b = AstBuilder::new();
    let rename = b.public_fn("rename", vec![b.param("to", b.ty("String"))], None, b.ident("to"));
    let class = b.class("Job", vec![("name", b.ty("String"))], vec![rename]);
    let call = b.method(
        b.construct("Job", vec![("name", b.string("a"))]),
        "rename",
        vec![b.ident("to")],
    );
    let run = b.public_fn("run", vec![b.param("to", b.optional(b.ty("String")))], None, call);
    let mut unit = b.unit("app.util", vec![class, Decl::Fn(run)]);
    let mut interner = b.into_interner();
    rewrite(&mut unit, &mut interner, &["api=app.util.Job"]);

    let mut interp = Interpreter::new(&interner);
    interp.load(&unit).unwrap();
    assert_eq!(interp.call("run", vec![Value::str("b")]).unwrap(), Value::str("b"));

    let err = interp.call("run", vec![Value::Nil]).unwrap_err();
    let failure = err.as_guard_failure().expect("guard failure");
    assert_eq!(failure.parameter, "to");
    assert_eq!(failure.function, "app.util.Job.rename");
}

#[test]
fn safe_arrays_distinguish_missing_from_stored_nil() {
    let b = AstBuilder::new();
    let missing = b.public_fn("missing", vec![], None, b.index(b.array(vec![b.int(1), b.nil()]), b.int(5)));
    let stored = b.public_fn("stored", vec![], None, b.index(b.array(vec![b.int(1), b.nil()]), b.int(1)));
    let plain = b.unit("app", vec![Decl::Fn(missing), Decl::Fn(stored)]);
    let mut wrapped = plain.clone();
    let mut interner = b.into_interner();
    rewrite(&mut wrapped, &mut interner, &["array=app"]);

    let mut before = Interpreter::new(&interner);
    before.load(&plain).unwrap();
    assert_eq!(before.call("missing", vec![]).unwrap(), Value::Nil);
    assert_eq!(before.call("stored", vec![]).unwrap(), Value::Nil);

    let mut after = Interpreter::new(&interner);
    after.load(&wrapped).unwrap();
    assert!(matches!(after.call("missing", vec![]).unwrap(), Value::Optional(None)));
    assert!(matches!(
        after.call("stored", vec![]).unwrap(),
        Value::Optional(Some(inner)) if matches!(*inner, Value::Nil)
    ));
}

#[test]
fn navigation_outside_activation_is_an_error() {
    let b = AstBuilder::new();
    let mut unit = safe_field_unit(&b);
    let mut interner = b.into_interner();
    let set = activations(&["navigation=other"]);

    let errors = Driver::new(&set).rewrite_unit(&mut unit, &mut interner).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        RewriteError::NavigationDisabled { declaration, .. } if declaration.to_string() == "app.get"
    ));
}

#[test]
fn recursive_ancestor_activation_is_honored() {
    let b = AstBuilder::new();
    let body = b.safe_field(b.ident("a"), "b");
    let f = b.public_fn("f", vec![b.param("a", b.optional(b.ty("Job")))], None, body);
    let mut unit = b.unit("app.deep.er", vec![Decl::Fn(f)]);
    let mut interner = b.into_interner();

    let direct = activations(&["navigation=app"]);
    assert!(Driver::new(&direct).rewrite_unit(&mut unit.clone(), &mut interner).is_err());

    let recursive = activations(&["navigation=app.*"]);
    let stats = Driver::new(&recursive).rewrite_unit(&mut unit, &mut interner).unwrap();
    assert_eq!(stats.navigations, 1);
}

#[test]
fn code_outside_every_activation_is_untouched() {
    let b = AstBuilder::new();
    let body = b.block(
        vec![b.let_stmt("xs", None, b.array(vec![b.int(1)]))],
        Some(b.field(b.ident("s"), "len")),
    );
    let f = b.public_fn("f", vec![b.param("s", b.ty("String"))], None, body);
    let mut unit = b.unit("lib", vec![Decl::Fn(f)]);
    let before = unit.clone();
    let mut interner = b.into_interner();

    let stats = Driver::new(&activations(&["all=app.*"]))
        .rewrite_unit(&mut unit, &mut interner)
        .unwrap();
    assert!(stats.is_empty());
    assert_eq!(unit, before);
}
