//! Abstract syntax tree for the host language.
//!
//! The host parser and type checker produce these nodes; the rewrite engine
//! mutates them in place; the backend consumes them. Children are owned
//! (`Box`/`Vec`), so a pass holding `&mut` to a node may replace it outright.
//!
//! # Modules
//!
//! - [`expr`] - Expression nodes, including the `?.` safe-access marker
//! - [`stmt`] - Statement nodes
//! - [`decl`] - Declarations and compilation units
//! - [`ty`] - Type annotations and their nullability

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod ty;

pub use decl::{CompilationUnit, Decl, FieldDecl, FnDecl, FnParam, Visibility};
pub use expr::{BinaryOp, CallArg, Expr, FieldInit, UnaryOp};
pub use stmt::Stmt;
pub use ty::{Nullability, Type};
