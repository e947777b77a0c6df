//! Evaluation errors.

use nullsafe_runtime::{GuardFailure, NullPointerFailure, RuntimeFailure};
use nullsafe_syntax::Span;
use std::fmt;

/// Errors that stop evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A guard or `sure` failed.
    Runtime(RuntimeFailure),

    /// A member was accessed on `nil` without safe navigation.
    NullReference {
        /// Field or method name
        member: String,
        /// Location of the access
        span: Span,
    },

    /// A name is not bound.
    Unbound {
        /// The name
        name: String,
        /// Location of the use
        span: Span,
    },

    /// A called function does not exist.
    UnknownFunction {
        /// Name as written
        name: String,
        /// Location of the call
        span: Span,
    },

    /// A field or method does not exist on a value.
    UnknownMember {
        /// Type of the receiver
        ty: String,
        /// Member name
        member: String,
        /// Location of the access
        span: Span,
    },

    /// Wrong number of arguments.
    Arity {
        /// Function name
        function: String,
        /// Declared parameter count
        expected: usize,
        /// Arguments given
        found: usize,
        /// Location of the call
        span: Span,
    },

    /// An operation was applied to a value of the wrong type.
    Type {
        /// What went wrong
        message: String,
        /// Location of the operation
        span: Span,
    },
}

impl EvalError {
    /// Source location, when the error is tied to a node.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            EvalError::Runtime(_) => None,
            EvalError::NullReference { span, .. }
            | EvalError::Unbound { span, .. }
            | EvalError::UnknownFunction { span, .. }
            | EvalError::UnknownMember { span, .. }
            | EvalError::Arity { span, .. }
            | EvalError::Type { span, .. } => Some(*span),
        }
    }

    /// The guard failure, if this is one.
    #[must_use]
    pub fn as_guard_failure(&self) -> Option<&GuardFailure> {
        match self {
            EvalError::Runtime(RuntimeFailure::Guard(failure)) => Some(failure),
            _ => None,
        }
    }

    pub(crate) fn type_error(message: impl Into<String>, span: Span) -> Self {
        EvalError::Type {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Runtime(failure) => failure.fmt(f),
            EvalError::NullReference { member, span } => {
                write!(f, "{span}: cannot access `{member}` on nil")
            }
            EvalError::Unbound { name, span } => write!(f, "{span}: `{name}` is not bound"),
            EvalError::UnknownFunction { name, span } => {
                write!(f, "{span}: no function named `{name}`")
            }
            EvalError::UnknownMember { ty, member, span } => {
                write!(f, "{span}: `{ty}` has no member `{member}`")
            }
            EvalError::Arity {
                function,
                expected,
                found,
                span,
            } => write!(
                f,
                "{span}: `{function}` takes {expected} arguments but {found} were given"
            ),
            EvalError::Type { message, span } => write!(f, "{span}: {message}"),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::Runtime(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<RuntimeFailure> for EvalError {
    fn from(failure: RuntimeFailure) -> Self {
        EvalError::Runtime(failure)
    }
}

impl From<GuardFailure> for EvalError {
    fn from(failure: GuardFailure) -> Self {
        EvalError::Runtime(failure.into())
    }
}

impl From<NullPointerFailure> for EvalError {
    fn from(failure: NullPointerFailure) -> Self {
        EvalError::Runtime(failure.into())
    }
}

/// Result type for evaluation.
pub type Result<T> = std::result::Result<T, EvalError>;
