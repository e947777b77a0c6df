//! `NullSafe` Runtime: optional-value combinators and runtime support
//!
//! This crate is the runtime half of `NullSafe`. It has no compile-time role
//! and does not know the rewrite engine exists:
//!
//! - **Combinators** ([`or`], [`or_get`], [`sure`], [`unchecked`], [`let_`],
//!   [`run`], [`apply`]) for handling `Option<T>` explicitly, from any code
//! - **[`SafeArray`]**, the sequence type array literals are wrapped in
//! - **Failures** ([`GuardFailure`], [`NullPointerFailure`]) raised by
//!   boundary guards and by `sure`
//!
//! The rewrite engine emits calls to the entry points named in [`entry`];
//! the dependency only goes that way.
//!
//! # Example
//!
//! ```
//! use nullsafe_runtime::{or, sure, SafeArray};
//!
//! let scores = SafeArray::from(vec![Some(3), None]);
//!
//! let first = scores.get(0).copied().flatten();
//! let missing = scores.get(9).copied().flatten();
//!
//! assert_eq!(or(first, 0), 3);
//! assert_eq!(or(missing, 0), 0);
//! assert!(sure(missing).is_err());
//! ```

#![warn(missing_docs)]

pub mod combinators;
pub mod failure;
pub mod safe_array;

pub use combinators::{apply, let_, or, or_get, run, sure, unchecked};
pub use failure::{CallSite, GuardFailure, NullPointerFailure, RuntimeFailure, ensure_present};
pub use safe_array::SafeArray;

/// Names under which the runtime is reachable from rewritten host code.
///
/// Injected guards call `nullsafe::guard_failure(parameter, function)`;
/// wrapped array literals become `nullsafe::SafeArray::from([..])`.
pub mod entry {
    /// Module path segment every entry point lives under.
    pub const MODULE: &str = "nullsafe";
    /// Raises a [`GuardFailure`](crate::GuardFailure).
    pub const GUARD_FAILURE: &str = "guard_failure";
    /// The [`SafeArray`](crate::SafeArray) type.
    pub const SAFE_ARRAY: &str = "SafeArray";
    /// `SafeArray` constructor taking a plain array.
    pub const SAFE_ARRAY_FROM: &str = "from";
    /// [`or`](crate::or) exposed to host code.
    pub const OR: &str = "or";
    /// [`sure`](crate::sure) exposed to host code.
    pub const SURE: &str = "sure";
}
