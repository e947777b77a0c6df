//! Array literal wrapping.
//!
//! `[e1, e2]` becomes `nullsafe::SafeArray::from([e1, e2])`. The wrapped
//! literal keeps its elements and their order; it is not visited again, so
//! one literal is wrapped exactly once.

use nullsafe_runtime::entry;
use nullsafe_syntax::ast::{CallArg, Expr};
use nullsafe_syntax::{Spanned, StringInterner};

/// Wraps an array literal in place. Returns `false` for any other node.
pub fn wrap(expr: &mut Expr, interner: &mut StringInterner) -> bool {
    if !matches!(expr, Expr::Array { .. }) {
        return false;
    }

    let span = expr.span();
    let segments = [entry::MODULE, entry::SAFE_ARRAY, entry::SAFE_ARRAY_FROM]
        .iter()
        .map(|segment| interner.intern(segment))
        .collect();

    let literal = expr.take();
    *expr = Expr::Call {
        callee: Box::new(Expr::Path { segments, span }),
        args: vec![CallArg::positional(literal)],
        span,
    };
    true
}
