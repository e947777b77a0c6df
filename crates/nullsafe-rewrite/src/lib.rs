//! `NullSafe` Rewrite: compile-time null-safety transformations
//!
//! This crate rewrites a host compiler's syntax tree before type checking.
//! Three independent rewrites are available, each enabled per package, type
//! or function through [`scope`] activations:
//!
//! - **Safe navigation** ([`navigation`]): `a?.b` and `a?.m(x)` become
//!   explicit nil checks that evaluate `a` once
//! - **API guards** ([`guard`]): public functions check their non-nullable
//!   parameters on entry
//! - **Safe arrays** ([`sequence`]): array literals are built as
//!   `nullsafe::SafeArray`
//!
//! Code outside every activation is left untouched, except that a `?.`
//! marker there is an error.
//!
//! # Example
//!
//! ```
//! use nullsafe_rewrite::{ActivationSet, Driver};
//! use nullsafe_syntax::ast::Decl;
//! use nullsafe_syntax::build::AstBuilder;
//! use nullsafe_syntax::pretty::PrettyPrinter;
//!
//! let b = AstBuilder::new();
//! let job = b.public_fn(
//!     "job",
//!     vec![b.param("s", b.ty("String"))],
//!     None,
//!     b.block(vec![], Some(b.array(vec![b.ident("s")]))),
//! );
//! let mut units = vec![b.unit("app.util", vec![Decl::Fn(job)])];
//! let mut interner = b.into_interner();
//!
//! let set = ActivationSet::builder()
//!     .directive("all=app.*")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let report = Driver::new(&set).rewrite_all(&mut units, &mut interner);
//!
//! assert!(report.is_success());
//! assert_eq!(report.stats.guards, 1);
//! assert_eq!(report.stats.sequences, 1);
//!
//! let printed = PrettyPrinter::new(&interner).print_unit(&units[0]);
//! assert!(printed.contains("nullsafe::guard_failure(\"s\", \"app.util.job\")"));
//! assert!(printed.contains("nullsafe::SafeArray::from([s])"));
//! ```

#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod guard;
pub mod navigation;
pub mod scope;
pub mod sequence;
pub mod validate;

pub use driver::{BuildReport, Driver, RewriteStats, UnitFailure};
pub use error::{Result, RewriteError};
pub use scope::{ActivationSet, ActivationSetBuilder, DeclScope, Feature, FeatureSet, ScopeActivation};
pub use validate::validate_activations;
