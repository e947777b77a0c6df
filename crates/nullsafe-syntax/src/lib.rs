//! `NullSafe` Syntax: the host tree model
//!
//! This crate defines the syntax tree that flows through the `NullSafe`
//! pipeline: the host parser produces it, the rewrite engine mutates it, the
//! backend consumes it.
//!
//! # Modules
//!
//! - [`span`] - Source location tracking
//! - [`symbol`] - Interned identifiers
//! - [`path`] - Fully-qualified dotted paths
//! - [`ast`] - Expressions, statements, declarations and types
//! - [`build`] - Programmatic tree construction
//! - [`pretty`] - Rendering trees back to source
//!
//! # Examples
//!
//! ```
//! use nullsafe_syntax::build::AstBuilder;
//! use nullsafe_syntax::pretty::PrettyPrinter;
//!
//! let b = AstBuilder::new();
//! let expr = b.safe_field(b.ident("user"), "name");
//! let interner = b.into_interner();
//!
//! assert_eq!(PrettyPrinter::new(&interner).print_expr(&expr), "user?.name");
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod build;
pub mod path;
pub mod pretty;
pub mod span;
pub mod symbol;

pub use path::{DotPath, PathError};
pub use span::{Span, Spanned};
pub use symbol::{StringInterner, Symbol};
