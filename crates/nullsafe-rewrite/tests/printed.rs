//! Rewritten trees as the printer renders them.

use nullsafe_rewrite::{ActivationSet, Driver};
use nullsafe_syntax::ast::Decl;
use nullsafe_syntax::build::AstBuilder;
use nullsafe_syntax::pretty::PrettyPrinter;

#[test]
fn all_features_in_one_function() {
    let b = AstBuilder::new();
    let body = b.block(
        vec![b.let_stmt("xs", None, b.array(vec![b.int(1), b.int(2)]))],
        Some(b.safe_method(b.ident("t"), "count", vec![b.ident("s")])),
    );
    let job = b.public_fn(
        "job",
        vec![b.param("s", b.ty("String")), b.param("t", b.optional(b.ty("Job")))],
        Some(b.ty("Int")),
        body,
    );
    let mut unit = b.unit("app.util", vec![Decl::Fn(job)]);
    let mut interner = b.into_interner();

    let set = ActivationSet::builder()
        .directive("all=app.util")
        .unwrap()
        .build()
        .unwrap();
    let stats = Driver::new(&set).rewrite_unit(&mut unit, &mut interner).unwrap();
    assert_eq!((stats.navigations, stats.guards, stats.sequences), (1, 1, 1));

    let expected = "\
package app.util;

pub fn job(s: String, t: Job?) -> Int {
    if s == nil {
        nullsafe::guard_failure(\"s\", \"app.util.job\");
    }
    let xs = nullsafe::SafeArray::from([1, 2]);
    {
        let __nullsafe_nav0 = t;
        if __nullsafe_nav0 == nil { nil } else { __nullsafe_nav0.count(s) }
    }
}
";
    assert_eq!(PrettyPrinter::new(&interner).print_unit(&unit), expected);
}

#[test]
fn chains_nest_inner_link_first() {
    let b = AstBuilder::new();
    let chain = b.safe_field(b.safe_field(b.ident("a"), "b"), "c");
    let f = b.private_fn("f", vec![b.param("a", b.optional(b.ty("Job")))], None, chain);
    let mut unit = b.unit("app", vec![Decl::Fn(f)]);
    let mut interner = b.into_interner();

    let set = ActivationSet::builder()
        .directive("navigation=app")
        .unwrap()
        .build()
        .unwrap();
    Driver::new(&set).rewrite_unit(&mut unit, &mut interner).unwrap();

    let expected = "\
package app;

fn f(a: Job?) {
    let __nullsafe_nav1 = {
        let __nullsafe_nav0 = a;
        if __nullsafe_nav0 == nil { nil } else { __nullsafe_nav0.b }
    };
    if __nullsafe_nav1 == nil { nil } else { __nullsafe_nav1.c }
}
";
    assert_eq!(PrettyPrinter::new(&interner).print_unit(&unit), expected);
}

#[test]
fn wrapped_literal_is_not_wrapped_twice() {
    let b = AstBuilder::new();
    let nested = b.array(vec![b.array(vec![b.int(1)]), b.array(vec![])]);
    let value = b.constant("GRID", b.array_ty(b.array_ty(b.ty("Int"))), nested);
    let mut unit = b.unit("app", vec![value]);
    let mut interner = b.into_interner();

    let set = ActivationSet::builder()
        .directive("array=app.GRID")
        .unwrap()
        .build()
        .unwrap();
    let stats = Driver::new(&set).rewrite_unit(&mut unit, &mut interner).unwrap();
    assert_eq!(stats.sequences, 3);

    assert_eq!(
        PrettyPrinter::new(&interner).print_unit(&unit),
        "package app;\n\npub const GRID: [[Int]] = nullsafe::SafeArray::from([\
         nullsafe::SafeArray::from([1]), nullsafe::SafeArray::from([])]);\n"
    );
}
