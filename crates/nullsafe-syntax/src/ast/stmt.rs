//! Statement nodes.

use crate::ast::expr::Expr;
use crate::ast::ty::Type;
use crate::span::{Span, Spanned};
use crate::symbol::Symbol;

/// A statement inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    /// Binding: `let x: Type = expr;` or `let mut x = expr;`
    Let {
        /// Variable name
        name: Symbol,
        /// Whether the binding may be reassigned
        mutable: bool,
        /// Optional type annotation
        type_annotation: Option<Type>,
        /// Optional initializer
        init: Option<Expr>,
        /// Source location
        span: Span,
    },

    /// Return statement: `return expr;` or `return;`
    Return {
        /// Optional return value
        value: Option<Expr>,
        /// Source location
        span: Span,
    },

    /// Assignment: `target = value;`
    Assign {
        /// Assignment target
        target: Expr,
        /// Value to assign
        value: Expr,
        /// Source location
        span: Span,
    },

    /// While loop: `while cond { body }`
    While {
        /// Loop condition
        condition: Expr,
        /// Loop body
        body: Expr,
        /// Source location
        span: Span,
    },

    /// Expression statement: `expr;`
    Expr {
        /// The expression
        expr: Expr,
        /// Source location
        span: Span,
    },
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Self::Let { span, .. }
            | Self::Return { span, .. }
            | Self::Assign { span, .. }
            | Self::While { span, .. }
            | Self::Expr { span, .. } => *span,
        }
    }
}
