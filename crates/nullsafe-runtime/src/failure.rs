//! Runtime failures raised by null-safety checks.
//!
//! Both kinds are programming-contract violations: nothing in this crate
//! retries or recovers from them, they are handed straight to the caller.

use std::fmt;
use std::panic::Location;

/// Where a failing call came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// Source file, when the host knows it
    pub file: Option<String>,
    /// Line (1-indexed)
    pub line: u32,
    /// Column (1-indexed)
    pub column: u32,
}

impl CallSite {
    /// A call site without file information.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Attaches a file name.
    #[must_use]
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.line(), location.column()).in_file(location.file())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}:{}:{}", self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

/// Raised by an injected boundary guard when `nil` reaches a parameter that
/// was declared non-nullable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GuardFailure {
    /// Name of the offending parameter
    pub parameter: String,
    /// Fully-qualified name of the guarded function
    pub function: String,
    /// Call that passed the null, if known
    pub call_site: Option<CallSite>,
}

impl GuardFailure {
    /// Creates a failure for `parameter` of `function`.
    #[must_use]
    pub fn new(parameter: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            function: function.into(),
            call_site: None,
        }
    }

    /// Records the originating call site.
    #[must_use]
    pub fn at(mut self, call_site: CallSite) -> Self {
        self.call_site = Some(call_site);
        self
    }
}

impl fmt::Display for GuardFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "null is not allowed for parameter `{}` of `{}`",
            self.parameter, self.function
        )?;
        if let Some(site) = &self.call_site {
            write!(f, " (called at {site})")?;
        }
        Ok(())
    }
}

impl std::error::Error for GuardFailure {}

/// Raised by [`sure`](crate::sure) when the asserted value is absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NullPointerFailure {
    /// Where `sure` was called
    pub call_site: CallSite,
}

impl NullPointerFailure {
    /// Creates a failure reported at `call_site`.
    #[must_use]
    pub const fn new(call_site: CallSite) -> Self {
        Self { call_site }
    }
}

impl fmt::Display for NullPointerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "null pointer: value asserted present at {}", self.call_site)
    }
}

impl std::error::Error for NullPointerFailure {}

/// Either runtime failure, for callers that propagate both with `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuntimeFailure {
    /// A boundary guard fired.
    Guard(GuardFailure),
    /// `sure` was given an absent value.
    NullPointer(NullPointerFailure),
}

impl fmt::Display for RuntimeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeFailure::Guard(failure) => failure.fmt(f),
            RuntimeFailure::NullPointer(failure) => failure.fmt(f),
        }
    }
}

impl std::error::Error for RuntimeFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeFailure::Guard(failure) => Some(failure),
            RuntimeFailure::NullPointer(failure) => Some(failure),
        }
    }
}

impl From<GuardFailure> for RuntimeFailure {
    fn from(failure: GuardFailure) -> Self {
        RuntimeFailure::Guard(failure)
    }
}

impl From<NullPointerFailure> for RuntimeFailure {
    fn from(failure: NullPointerFailure) -> Self {
        RuntimeFailure::NullPointer(failure)
    }
}

/// Checks an argument the way an injected guard does.
///
/// Rust callers crossing into guarded code can use this to fail at their own
/// boundary instead.
///
/// ```
/// use nullsafe_runtime::ensure_present;
///
/// assert_eq!(ensure_present(Some(3), "count", "app.util.job"), Ok(3));
/// let err = ensure_present::<i32>(None, "count", "app.util.job").unwrap_err();
/// assert_eq!(err.parameter, "count");
/// ```
#[track_caller]
pub fn ensure_present<T>(value: Option<T>, parameter: &str, function: &str) -> Result<T, GuardFailure> {
    match value {
        Some(value) => Ok(value),
        None => Err(GuardFailure::new(parameter, function).at(Location::caller().into())),
    }
}
