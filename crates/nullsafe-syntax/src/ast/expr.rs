//! Expression nodes.
//!
//! Expressions own their children through `Box`, so a rewrite pass can take
//! a subtree out of its parent with [`Expr::take`], build a replacement
//! around it and put the replacement back in place.

use crate::ast::stmt::Stmt;
use crate::span::{Span, Spanned};
use crate::symbol::Symbol;
use std::fmt;

/// An expression in the host language.
///
/// # Examples
///
/// ```
/// use nullsafe_syntax::ast::Expr;
/// use nullsafe_syntax::span::Span;
///
/// let nil = Expr::Nil { span: Span::new(0, 3, 1, 1) };
/// assert!(nil.is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    // ===== Literals =====

    /// Integer literal: `42`
    IntegerLiteral {
        /// The value
        value: i64,
        /// Source location
        span: Span,
    },

    /// String literal: `"hello"`
    StringLiteral {
        /// The string contents (interned)
        value: Symbol,
        /// Source location
        span: Span,
    },

    /// Boolean literal: `true` or `false`
    BoolLiteral {
        /// The value
        value: bool,
        /// Source location
        span: Span,
    },

    /// The null sentinel: `nil`
    Nil {
        /// Source location
        span: Span,
    },

    // ===== Names =====

    /// Simple identifier: `x`
    Identifier {
        /// The name
        name: Symbol,
        /// Source location
        span: Span,
    },

    /// Path expression: `nullsafe::SafeArray::from`
    Path {
        /// Path segments
        segments: Vec<Symbol>,
        /// Source location
        span: Span,
    },

    // ===== Operators =====

    /// Unary operator expression: `-x`, `!flag`
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// Binary operator expression: `a + b`, `x == nil`
    Binary {
        /// Left operand
        left: Box<Expr>,
        /// The operator
        op: BinaryOp,
        /// Right operand
        right: Box<Expr>,
        /// Source location
        span: Span,
    },

    // ===== Control Flow =====

    /// If expression: `if cond { then } else { else }`
    If {
        /// Condition
        condition: Box<Expr>,
        /// Then branch
        then_branch: Box<Expr>,
        /// Else branch
        else_branch: Option<Box<Expr>>,
        /// Source location
        span: Span,
    },

    /// Block expression: `{ stmts; expr }`
    Block {
        /// Statements in the block
        stmts: Vec<Stmt>,
        /// Optional trailing expression, the value of the block
        expr: Option<Box<Expr>>,
        /// Source location
        span: Span,
    },

    // ===== Calls and access =====

    /// Function call: `foo(a, b)`
    Call {
        /// Function expression
        callee: Box<Expr>,
        /// Arguments
        args: Vec<CallArg>,
        /// Source location
        span: Span,
    },

    /// Method call: `obj.method(a)` or, when `safe`, `obj?.method(a)`
    MethodCall {
        /// Receiver
        receiver: Box<Expr>,
        /// Method name
        method: Symbol,
        /// Arguments
        args: Vec<CallArg>,
        /// Whether the access carries the safe-navigation marker
        safe: bool,
        /// Source location
        span: Span,
    },

    /// Field access: `obj.field` or, when `safe`, `obj?.field`
    Field {
        /// Object expression
        object: Box<Expr>,
        /// Field name
        field: Symbol,
        /// Whether the access carries the safe-navigation marker
        safe: bool,
        /// Source location
        span: Span,
    },

    /// Index access: `arr[index]`
    Index {
        /// Collection expression
        collection: Box<Expr>,
        /// Index expression
        index: Box<Expr>,
        /// Source location
        span: Span,
    },

    // ===== Construction =====

    /// Struct or class construction: `Point { x: 0, y: 0 }`
    Struct {
        /// Type name
        name: Symbol,
        /// Field initializers, evaluated in order
        fields: Vec<FieldInit>,
        /// Source location
        span: Span,
    },

    /// Array literal: `[1, 2, 3]`
    Array {
        /// Elements, evaluated left to right
        elements: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// Parenthesized expression: `(expr)`
    Paren {
        /// Inner expression
        expr: Box<Expr>,
        /// Source location
        span: Span,
    },
}

impl Expr {
    /// Moves the expression out, leaving a `nil` with the same span behind.
    ///
    /// Rewrites use this to take ownership of a subtree they are about to
    /// wrap; the placeholder is always overwritten before the pass returns.
    pub fn take(&mut self) -> Expr {
        let span = self.span();
        std::mem::replace(self, Expr::Nil { span })
    }

    /// Returns `true` for the `nil` literal.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Expr::Nil { .. })
    }

    /// Returns `true` if this is a field access or method call carrying the
    /// safe-navigation marker.
    #[must_use]
    pub const fn is_safe_access(&self) -> bool {
        matches!(
            self,
            Expr::Field { safe: true, .. } | Expr::MethodCall { safe: true, .. }
        )
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Self::IntegerLiteral { span, .. }
            | Self::StringLiteral { span, .. }
            | Self::BoolLiteral { span, .. }
            | Self::Nil { span }
            | Self::Identifier { span, .. }
            | Self::Path { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::If { span, .. }
            | Self::Block { span, .. }
            | Self::Call { span, .. }
            | Self::MethodCall { span, .. }
            | Self::Field { span, .. }
            | Self::Index { span, .. }
            | Self::Struct { span, .. }
            | Self::Array { span, .. }
            | Self::Paren { span, .. } => *span,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Logical negation: `!`
    Not,
    /// Arithmetic negation: `-`
    Minus,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not => write!(f, "!"),
            Self::Minus => write!(f, "-"),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition: `+`
    Add,
    /// Subtraction: `-`
    Sub,
    /// Multiplication: `*`
    Mul,
    /// Equality: `==`
    Eq,
    /// Inequality: `!=`
    Neq,
    /// Less than: `<`
    Lt,
    /// Greater than: `>`
    Gt,
    /// Logical AND: `&&`
    And,
    /// Logical OR: `||`
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::And => "&&",
            Self::Or => "||",
        };
        f.write_str(text)
    }
}

/// A call argument: `expr` or `label: expr`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallArg {
    /// Optional label for named arguments
    pub label: Option<Symbol>,
    /// The argument expression
    pub value: Expr,
}

impl CallArg {
    /// An unlabeled argument.
    #[must_use]
    pub const fn positional(value: Expr) -> Self {
        Self { label: None, value }
    }
}

/// A field initializer in a construction expression: `name: value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldInit {
    /// Field name
    pub name: Symbol,
    /// Field value
    pub value: Expr,
}
