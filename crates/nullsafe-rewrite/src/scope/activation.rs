//! Single activations and the `feature=path` directive syntax.
//!
//! ```text
//! navigation=app.util        functions declared directly in app.util
//! api=app.*                  app and everything beneath it
//! array=app.util.Job.run     one method
//! all=app.core.*             all three features
//! ```

use super::{DeclScope, Feature};
use crate::error::{Result, RewriteError};
use nullsafe_syntax::DotPath;
use std::fmt;
use std::str::FromStr;

const RECURSIVE_SUFFIX: &str = ".*";

/// Enables one [`Feature`] for a path, optionally including every
/// declaration nested beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeActivation {
    /// Package, type or function path
    pub path: DotPath,
    /// Whether nested declarations are covered too
    pub recursive: bool,
    /// The feature enabled
    pub feature: Feature,
}

impl ScopeActivation {
    /// Creates an activation.
    #[must_use]
    pub const fn new(path: DotPath, recursive: bool, feature: Feature) -> Self {
        Self {
            path,
            recursive,
            feature,
        }
    }

    /// Returns `true` if this activation covers the declaration.
    ///
    /// A recursive activation covers every declaration whose path starts
    /// with its own. A non-recursive one covers a declaration only when it
    /// names the declaration itself or one of its direct containers.
    #[must_use]
    pub fn covers(&self, scope: &DeclScope) -> bool {
        if self.recursive {
            self.path.is_prefix_of(scope.path())
        } else {
            scope.containers().any(|container| *container == self.path)
        }
    }
}

impl fmt::Display for ScopeActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.feature, self.path)?;
        if self.recursive {
            f.write_str(RECURSIVE_SUFFIX)?;
        }
        Ok(())
    }
}

fn invalid(directive: &str, reason: impl Into<String>) -> RewriteError {
    RewriteError::InvalidDirective {
        directive: directive.to_string(),
        reason: reason.into(),
    }
}

/// Splits `feature=path[.*]` into its feature text, path and recursive flag.
fn split_directive(directive: &str) -> Result<(&str, DotPath, bool)> {
    let Some((feature, target)) = directive.split_once('=') else {
        return Err(invalid(directive, "expected `feature=path`"));
    };

    let target = target.trim();
    let (target, recursive) = match target.strip_suffix(RECURSIVE_SUFFIX) {
        Some(prefix) => (prefix, true),
        None if target == "*" => ("", true),
        None => (target, false),
    };

    let path = DotPath::parse(target).map_err(|err| invalid(directive, err.to_string()))?;
    Ok((feature.trim(), path, recursive))
}

/// Parses one directive into its activations.
///
/// `all=path` expands to one activation per [`Feature`]; every other
/// feature name yields exactly one.
///
/// ```
/// use nullsafe_rewrite::scope::{parse_directive, Feature};
///
/// let parsed = parse_directive("all=app.core.*").unwrap();
/// assert_eq!(parsed.len(), 3);
/// assert!(parsed.iter().all(|a| a.recursive));
///
/// let nav = parse_directive("navigation=app.util").unwrap();
/// assert_eq!(nav[0].feature, Feature::Navigation);
/// assert!(!nav[0].recursive);
/// ```
pub fn parse_directive(directive: &str) -> Result<Vec<ScopeActivation>> {
    let (feature, path, recursive) = split_directive(directive)?;

    let features: Vec<Feature> = if feature.eq_ignore_ascii_case("all") {
        Feature::ALL.to_vec()
    } else {
        let feature = feature
            .parse::<Feature>()
            .map_err(|err| invalid(directive, err.to_string()))?;
        vec![feature]
    };

    if path.is_root() {
        return Err(RewriteError::EmptyPath { feature: features[0] });
    }

    Ok(features
        .into_iter()
        .map(|feature| ScopeActivation::new(path.clone(), recursive, feature))
        .collect())
}

impl FromStr for ScopeActivation {
    type Err = RewriteError;

    /// Parses a single-feature directive; `all=` is rejected since it
    /// stands for several activations.
    fn from_str(s: &str) -> Result<Self> {
        let mut parsed = parse_directive(s)?;
        if parsed.len() != 1 {
            return Err(invalid(s, "`all` expands to several activations"));
        }
        Ok(parsed.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> DotPath {
        DotPath::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        for text in ["navigation=app.util", "api=app.*", "array=app.util.Job.run"] {
            let activation: ScopeActivation = text.parse().unwrap();
            assert_eq!(activation.to_string(), text);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "navigation".parse::<ScopeActivation>(),
            Err(RewriteError::InvalidDirective { .. })
        ));
        assert!(matches!(
            "paint=app".parse::<ScopeActivation>(),
            Err(RewriteError::InvalidDirective { .. })
        ));
        assert!(matches!(
            "api=app..util".parse::<ScopeActivation>(),
            Err(RewriteError::InvalidDirective { .. })
        ));
        assert_eq!(
            "api=".parse::<ScopeActivation>(),
            Err(RewriteError::EmptyPath { feature: Feature::ApiGuard })
        );
        assert_eq!(
            "array=*".parse::<ScopeActivation>(),
            Err(RewriteError::EmptyPath { feature: Feature::SequenceWrap })
        );
        assert!("all=app".parse::<ScopeActivation>().is_err());
    }

    #[test]
    fn test_recursive_covers_descendants() {
        let activation = ScopeActivation::new(path("app"), true, Feature::Navigation);
        assert!(activation.covers(&DeclScope::item(&path("app"), "main")));
        assert!(activation.covers(&DeclScope::item(&path("app.util"), "job")));
        assert!(activation.covers(&DeclScope::method(&path("app.util"), "Job", "run")));
        assert!(!activation.covers(&DeclScope::item(&path("application"), "main")));
        assert!(!activation.covers(&DeclScope::item(&path("lib"), "app")));
    }

    #[test]
    fn test_non_recursive_covers_direct_members() {
        let activation = ScopeActivation::new(path("app.util"), false, Feature::Navigation);
        assert!(activation.covers(&DeclScope::item(&path("app.util"), "job")));
        assert!(activation.covers(&DeclScope::method(&path("app.util"), "Job", "run")));
        assert!(!activation.covers(&DeclScope::item(&path("app.util.deep"), "job")));
        assert!(!activation.covers(&DeclScope::item(&path("app"), "job")));

        let on_type = ScopeActivation::new(path("app.util.Job"), false, Feature::ApiGuard);
        assert!(on_type.covers(&DeclScope::method(&path("app.util"), "Job", "run")));
        assert!(!on_type.covers(&DeclScope::item(&path("app.util"), "job")));
    }
}
