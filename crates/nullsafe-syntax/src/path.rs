//! Fully-qualified dotted paths (`app.util.Job.run`).
//!
//! Packages, types and functions are all addressed by a [`DotPath`]. The
//! empty path is the root package.

use std::fmt;
use std::str::FromStr;

/// A dotted, fully-qualified path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DotPath {
    segments: Vec<String>,
}

/// Error returned when a dotted path has an empty or malformed segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    /// The rejected input
    pub input: String,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid dotted path `{}`", self.input)
    }
}

impl std::error::Error for PathError {}

impl DotPath {
    /// The root package.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parses `a.b.c`. The empty string parses to the root path.
    ///
    /// ```
    /// use nullsafe_syntax::DotPath;
    ///
    /// let path = DotPath::parse("app.util").unwrap();
    /// assert_eq!(path.len(), 2);
    /// assert!(DotPath::parse("app..util").is_err());
    /// assert!(DotPath::parse("").unwrap().is_root());
    /// ```
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('.') {
            let valid = !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_');
            if !valid {
                return Err(PathError {
                    input: input.to_string(),
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    /// Returns the enclosing path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Returns `true` if `self` equals `other` or is one of its ancestors.
    ///
    /// Matching is segment-wise: `app` is a prefix of `app.util` but not of
    /// `application`.
    #[must_use]
    pub fn is_prefix_of(&self, other: &DotPath) -> bool {
        other.segments.len() >= self.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a == b)
    }

    /// Iterates over `self` and every ancestor, longest first, root last.
    pub fn ancestors(&self) -> impl Iterator<Item = DotPath> + '_ {
        (0..=self.segments.len()).rev().map(|len| Self {
            segments: self.segments[..len].to_vec(),
        })
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the last segment, if any.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Same as [`DotPath::is_root`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` for the root package.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for DotPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> DotPath {
        DotPath::parse(s).unwrap()
    }

    #[test]
    fn test_prefix_is_segment_wise() {
        assert!(path("app").is_prefix_of(&path("app.util.job")));
        assert!(path("app.util").is_prefix_of(&path("app.util")));
        assert!(!path("app").is_prefix_of(&path("application")));
        assert!(!path("app.util.job").is_prefix_of(&path("app.util")));
        assert!(DotPath::root().is_prefix_of(&path("anything")));
    }

    #[test]
    fn test_child_and_parent() {
        let job = path("app.util").child("job");
        assert_eq!(job.to_string(), "app.util.job");
        assert_eq!(job.parent(), Some(path("app.util")));
        assert_eq!(DotPath::root().parent(), None);
        assert_eq!(job.last(), Some("job"));
    }

    #[test]
    fn test_ancestors_longest_first() {
        let all: Vec<String> = path("a.b.c").ancestors().map(|p| p.to_string()).collect();
        assert_eq!(all, vec!["a.b.c", "a.b", "a", ""]);
    }

    #[test]
    fn test_parse_rejects_bad_segments() {
        assert!(DotPath::parse(".app").is_err());
        assert!(DotPath::parse("app.").is_err());
        assert!(DotPath::parse("app.*").is_err());
        assert_eq!("  app.util ".parse::<DotPath>().unwrap(), path("app.util"));
    }
}
