//! `NullSafe` Interpreter: a small evaluator for host syntax trees
//!
//! Rewritten code is only interesting once it runs. This crate evaluates
//! [`CompilationUnit`](nullsafe_syntax::ast::CompilationUnit)s directly so
//! the effect of a rewrite can be observed:
//!
//! - member access on `nil` raises [`EvalError::NullReference`]
//! - injected guards raise a [`GuardFailure`](nullsafe_runtime::GuardFailure)
//!   naming the parameter, the function and the call site
//! - `nullsafe::SafeArray` reads yield [`Value::Optional`], plain array reads
//!   past the end yield `nil`
//!
//! The runtime entry points (`nullsafe::guard_failure`,
//! `nullsafe::SafeArray::from`, `nullsafe::or`, `nullsafe::sure`) are built
//! in; anything else can be supplied with
//! [`Interpreter::register_native`].

#![warn(missing_docs)]

pub mod env;
pub mod error;
pub mod interp;
pub mod value;

pub use error::{EvalError, Result};
pub use interp::{Interpreter, NativeFn};
pub use value::{Object, Value};
