//! Boundary guards for public functions.
//!
//! For each parameter whose declared type is non-nullable, a check
//!
//! ```text
//! if s == nil {
//!     nullsafe::guard_failure("s", "app.util.job");
//! }
//! ```
//!
//! is placed at the start of the body, in declaration order, before any
//! original statement runs.

use nullsafe_runtime::entry;
use nullsafe_syntax::ast::{BinaryOp, CallArg, Expr, FnDecl, FnParam, Nullability, Stmt};
use nullsafe_syntax::{DotPath, Span, Spanned, StringInterner, Symbol};

/// Parameters of `func` that need a guard: those whose annotation is
/// known to be non-nullable.
pub fn guarded_params<'f>(
    func: &'f FnDecl,
    interner: &'f StringInterner,
) -> impl Iterator<Item = &'f FnParam> {
    func.params
        .iter()
        .filter(move |param| param.type_annotation.nullability(interner) == Nullability::NonNullable)
}

/// Inserts guards for the non-nullable parameters of `func`, which is
/// reachable as `function`. Returns the number of guards inserted.
///
/// A function with nothing to guard is left exactly as it was.
pub fn inject(func: &mut FnDecl, function: &DotPath, interner: &mut StringInterner) -> usize {
    let targets: Vec<(Symbol, Span)> = guarded_params(func, interner)
        .map(|param| (param.name, param.span))
        .collect();
    if targets.is_empty() {
        return 0;
    }

    let callee = GuardCallee::intern(function, interner);
    let guards: Vec<Stmt> = targets
        .iter()
        .map(|&(param, span)| callee.check(param, span))
        .collect();
    let count = guards.len();

    match &mut func.body {
        Expr::Block { stmts, .. } => {
            stmts.splice(0..0, guards);
        }
        body => {
            let span = body.span();
            let original = body.take();
            *body = Expr::Block {
                stmts: guards,
                expr: Some(Box::new(original)),
                span,
            };
        }
    }

    count
}

/// Interned pieces of `nullsafe::guard_failure(_, "function")`.
struct GuardCallee {
    module: Symbol,
    entry: Symbol,
    function: Symbol,
}

impl GuardCallee {
    fn intern(function: &DotPath, interner: &mut StringInterner) -> Self {
        Self {
            module: interner.intern(entry::MODULE),
            entry: interner.intern(entry::GUARD_FAILURE),
            function: interner.intern(&function.to_string()),
        }
    }

    /// `if param == nil { nullsafe::guard_failure("param", "function"); }`
    fn check(&self, param: Symbol, span: Span) -> Stmt {
        let fail = Expr::Call {
            callee: Box::new(Expr::Path {
                segments: vec![self.module, self.entry],
                span,
            }),
            args: vec![
                CallArg::positional(Expr::StringLiteral { value: param, span }),
                CallArg::positional(Expr::StringLiteral {
                    value: self.function,
                    span,
                }),
            ],
            span,
        };

        let condition = Expr::Binary {
            left: Box::new(Expr::Identifier { name: param, span }),
            op: BinaryOp::Eq,
            right: Box::new(Expr::Nil { span }),
            span,
        };

        let check = Expr::If {
            condition: Box::new(condition),
            then_branch: Box::new(Expr::Block {
                stmts: vec![Stmt::Expr { expr: fail, span }],
                expr: None,
                span,
            }),
            else_branch: None,
            span,
        };

        Stmt::Expr { expr: check, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nullsafe_syntax::build::AstBuilder;
    use nullsafe_syntax::pretty::PrettyPrinter;

    fn job_path() -> DotPath {
        DotPath::parse("app.util.job").unwrap()
    }

    #[test]
    fn test_guards_in_declaration_order() {
        let b = AstBuilder::new();
        let mut func = b.public_fn(
            "job",
            vec![
                b.param("s", b.ty("String")),
                b.param("t", b.optional(b.ty("String"))),
                b.param("n", b.ty("Int")),
            ],
            None,
            b.block(vec![b.stmt(b.call_named("work", vec![]))], None),
        );
        let mut interner = b.into_interner();

        assert_eq!(inject(&mut func, &job_path(), &mut interner), 2);

        let body = PrettyPrinter::new(&interner).print_expr(&func.body);
        assert_eq!(
            body,
            "{\n    if s == nil {\n        nullsafe::guard_failure(\"s\", \"app.util.job\");\n    }\n    \
             if n == nil {\n        nullsafe::guard_failure(\"n\", \"app.util.job\");\n    }\n    work();\n}"
        );
    }

    #[test]
    fn test_expression_body_is_wrapped() {
        let b = AstBuilder::new();
        let mut func = b.public_fn("len", vec![b.param("s", b.ty("String"))], None, b.int(1));
        let mut interner = b.into_interner();

        assert_eq!(inject(&mut func, &job_path(), &mut interner), 1);
        match &func.body {
            Expr::Block { stmts, expr, .. } => {
                assert_eq!(stmts.len(), 1);
                assert!(matches!(expr.as_deref(), Some(Expr::IntegerLiteral { value: 1, .. })));
            }
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn test_nothing_to_guard() {
        let b = AstBuilder::new();
        let mut func = b.public_fn(
            "maybe",
            vec![
                b.param("t", b.optional(b.ty("String"))),
                b.param("u", b.generic("Null", vec![b.ty("Int")])),
                b.param("v", b.inferred()),
            ],
            None,
            b.int(1),
        );
        let before = func.clone();
        let mut interner = b.into_interner();

        assert_eq!(inject(&mut func, &job_path(), &mut interner), 0);
        assert_eq!(func, before);
    }
}
