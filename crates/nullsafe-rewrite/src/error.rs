//! Rewrite errors.
//!
//! Navigation errors abort the compilation unit they occur in. Configuration
//! errors are reported but never abort a build.

use crate::scope::{Feature, ScopeActivation};
use nullsafe_syntax::{DotPath, Span};
use std::fmt;

/// Errors raised while configuring or running the rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// A `?.` marker appeared in a declaration without navigation enabled.
    NavigationDisabled {
        /// Fully-qualified path of the enclosing declaration
        declaration: DotPath,
        /// Location of the marker
        span: Span,
    },

    /// An activation names a path no compilation unit declares.
    UnresolvedActivation {
        /// The offending activation
        activation: ScopeActivation,
    },

    /// A `feature=path` directive could not be parsed.
    InvalidDirective {
        /// The directive as written
        directive: String,
        /// What was wrong with it
        reason: String,
    },

    /// An activation targets the empty path.
    EmptyPath {
        /// Feature the activation was for
        feature: Feature,
    },

    /// [`install`](crate::scope::install) was called a second time.
    ActivationsAlreadyInstalled,
}

impl RewriteError {
    /// Source location, for errors tied to a node.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            RewriteError::NavigationDisabled { span, .. } => Some(*span),
            _ => None,
        }
    }

    /// Returns `true` for errors that only affect configuration.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        !matches!(self, RewriteError::NavigationDisabled { .. })
    }
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::NavigationDisabled { declaration, span } => write!(
                f,
                "safe navigation used at {span} in `{declaration}`, but navigation is not enabled for this scope"
            ),
            RewriteError::UnresolvedActivation { activation } => {
                write!(f, "activation `{activation}` does not match any declared package, type or function")
            }
            RewriteError::InvalidDirective { directive, reason } => {
                write!(f, "invalid directive `{directive}`: {reason}")
            }
            RewriteError::EmptyPath { feature } => {
                write!(f, "activation for `{feature}` has an empty path")
            }
            RewriteError::ActivationsAlreadyInstalled => {
                write!(f, "scope activations were already installed for this build")
            }
        }
    }
}

impl std::error::Error for RewriteError {}

/// Result type for rewrite configuration.
pub type Result<T> = std::result::Result<T, RewriteError>;
