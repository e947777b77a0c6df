//! Safe-navigation expansion.
//!
//! `a?.b` becomes
//!
//! ```text
//! {
//!     let __nullsafe_nav0 = a;
//!     if __nullsafe_nav0 == nil { nil } else { __nullsafe_nav0.b }
//! }
//! ```
//!
//! and `a?.m(x)` the same with a plain `.m(x)` in the else branch, so the
//! receiver is evaluated exactly once and the member is never touched when
//! it is `nil`. Arguments sit inside the else branch and are skipped along
//! with the call. Chains need no special casing: the driver expands inner
//! markers first, so `a?.b?.c` nests one template inside the next.

use nullsafe_syntax::ast::{BinaryOp, Expr, Stmt};
use nullsafe_syntax::{Span, Spanned, StringInterner, Symbol};

const TEMP_PREFIX: &str = "__nullsafe_nav";

/// Hands out temporary names unique within one compilation unit.
///
/// A candidate already present in the interner may be a user name, so it is
/// skipped and never shadows or captures a host binding.
#[derive(Debug, Default)]
pub struct TempNames {
    next: u32,
    issued: u32,
}

impl TempNames {
    /// Creates a fresh counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns and returns the next temporary not yet known to `interner`.
    pub fn fresh(&mut self, interner: &mut StringInterner) -> Symbol {
        loop {
            let name = format!("{TEMP_PREFIX}{}", self.next);
            self.next += 1;
            if interner.get(&name).is_none() {
                self.issued += 1;
                return interner.intern(&name);
            }
        }
    }

    /// Number of temporaries handed out so far.
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.issued
    }
}

/// Expands a marked field access or method call in place.
///
/// The marker's children must already be expanded. Returns `false`, leaving
/// `expr` untouched, if it carries no marker.
pub fn expand(expr: &mut Expr, temp: Symbol) -> bool {
    if !expr.is_safe_access() {
        return false;
    }

    let span = expr.span();
    let (receiver, access) = match expr.take() {
        Expr::Field {
            object,
            field,
            span,
            ..
        } => (
            *object,
            Expr::Field {
                object: Box::new(reference(temp, span)),
                field,
                safe: false,
                span,
            },
        ),
        Expr::MethodCall {
            receiver,
            method,
            args,
            span,
            ..
        } => (
            *receiver,
            Expr::MethodCall {
                receiver: Box::new(reference(temp, span)),
                method,
                args,
                safe: false,
                span,
            },
        ),
        other => {
            *expr = other;
            return false;
        }
    };

    *expr = null_checked(temp, receiver, access, span);
    true
}

fn reference(temp: Symbol, span: Span) -> Expr {
    Expr::Identifier { name: temp, span }
}

fn single(expr: Expr, span: Span) -> Box<Expr> {
    Box::new(Expr::Block {
        stmts: Vec::new(),
        expr: Some(Box::new(expr)),
        span,
    })
}

/// `{ let temp = receiver; if temp == nil { nil } else { access } }`
fn null_checked(temp: Symbol, receiver: Expr, access: Expr, span: Span) -> Expr {
    let binding = Stmt::Let {
        name: temp,
        mutable: false,
        type_annotation: None,
        init: Some(receiver),
        span,
    };

    let is_nil = Expr::Binary {
        left: Box::new(reference(temp, span)),
        op: BinaryOp::Eq,
        right: Box::new(Expr::Nil { span }),
        span,
    };

    let branch = Expr::If {
        condition: Box::new(is_nil),
        then_branch: single(Expr::Nil { span }, span),
        else_branch: Some(single(access, span)),
        span,
    };

    Expr::Block {
        stmts: vec![binding],
        expr: Some(Box::new(branch)),
        span,
    }
}
