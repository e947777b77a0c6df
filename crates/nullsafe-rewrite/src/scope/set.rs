//! The activation set consulted during rewriting, and its process-wide
//! installation.

use super::{DeclScope, Feature, FeatureSet, ScopeActivation, parse_directive};
use crate::error::{Result, RewriteError};
use hashbrown::HashMap;
use nullsafe_syntax::DotPath;
use std::sync::OnceLock;

static INSTALLED: OnceLock<ActivationSet> = OnceLock::new();

/// All activations for one build, grouped by feature.
///
/// Built once before any unit is rewritten and read-only afterwards, so it
/// can be shared freely between units.
///
/// ```
/// use nullsafe_rewrite::scope::{ActivationSet, DeclScope, Feature};
/// use nullsafe_syntax::DotPath;
///
/// let set = ActivationSet::builder()
///     .directive("navigation=app.*")
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let scope = DeclScope::item(&DotPath::parse("app.util").unwrap(), "job");
/// assert!(set.is_enabled_for(&scope, Feature::Navigation));
/// assert!(!set.is_enabled_for(&scope, Feature::ApiGuard));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActivationSet {
    rules: HashMap<Feature, Vec<ScopeActivation>>,
}

impl ActivationSet {
    /// Starts building a set.
    #[must_use]
    pub fn builder() -> ActivationSetBuilder {
        ActivationSetBuilder::default()
    }

    /// A set with nothing enabled anywhere.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns whether `feature` is active for the declaration.
    #[must_use]
    pub fn is_enabled_for(&self, scope: &DeclScope, feature: Feature) -> bool {
        self.rules
            .get(&feature)
            .is_some_and(|rules| rules.iter().any(|rule| rule.covers(scope)))
    }

    /// Returns whether `feature` is active for the declaration at `path`.
    ///
    /// A bare path does not say whether its parent is a package or a type,
    /// so both readings are tried: `pkg.item` and `pkg.Owner.method`. Every
    /// declaration [`ActivationSet::is_enabled_for`] enables answers `true`.
    #[must_use]
    pub fn is_enabled(&self, path: &DotPath, feature: Feature) -> bool {
        let (Some(parent), Some(name)) = (path.parent(), path.last()) else {
            return false;
        };
        if self.is_enabled_for(&DeclScope::item(&parent, name), feature) {
            return true;
        }
        match (parent.parent(), parent.last()) {
            (Some(package), Some(owner)) => {
                self.is_enabled_for(&DeclScope::method(&package, owner, name), feature)
            }
            _ => false,
        }
    }

    /// Every feature active for the declaration.
    #[must_use]
    pub fn features_for(&self, scope: &DeclScope) -> FeatureSet {
        let mut features = FeatureSet::default();
        for feature in Feature::ALL {
            if self.is_enabled_for(scope, feature) {
                features.insert(feature);
            }
        }
        features
    }

    /// Iterates over all activations, grouped by feature in
    /// [`Feature::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &ScopeActivation> {
        Feature::ALL
            .into_iter()
            .filter_map(|feature| self.rules.get(&feature))
            .flatten()
    }

    /// Number of activations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is activated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects activations and checks them.
#[derive(Debug, Clone, Default)]
pub struct ActivationSetBuilder {
    activations: Vec<ScopeActivation>,
}

impl ActivationSetBuilder {
    /// Enables `feature` for `path`.
    #[must_use]
    pub fn activate(mut self, path: DotPath, recursive: bool, feature: Feature) -> Self {
        self.activations.push(ScopeActivation::new(path, recursive, feature));
        self
    }

    /// Enables every feature for `path`.
    #[must_use]
    pub fn enable_all(mut self, path: &DotPath, recursive: bool) -> Self {
        for feature in Feature::ALL {
            self = self.activate(path.clone(), recursive, feature);
        }
        self
    }

    /// Adds the activations of one `feature=path[.*]` directive.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::InvalidDirective`] or
    /// [`RewriteError::EmptyPath`] when the directive is malformed.
    pub fn directive(mut self, directive: &str) -> Result<Self> {
        self.activations.extend(parse_directive(directive)?);
        Ok(self)
    }

    /// Adds several directives, stopping at the first bad one.
    ///
    /// # Errors
    ///
    /// Same as [`ActivationSetBuilder::directive`].
    pub fn directives<'a>(self, directives: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        directives
            .into_iter()
            .try_fold(self, ActivationSetBuilder::directive)
    }

    /// Finishes the set.
    ///
    /// Duplicate activations are kept once.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::EmptyPath`] if any activation targets the
    /// empty path.
    pub fn build(self) -> Result<ActivationSet> {
        let mut rules: HashMap<Feature, Vec<ScopeActivation>> = HashMap::new();
        for activation in self.activations {
            if activation.path.is_root() {
                return Err(RewriteError::EmptyPath {
                    feature: activation.feature,
                });
            }
            let bucket = rules.entry(activation.feature).or_default();
            if !bucket.contains(&activation) {
                bucket.push(activation);
            }
        }
        Ok(ActivationSet { rules })
    }
}

/// Installs the build-wide activation set.
///
/// The set must be installed before any unit is rewritten and can only be
/// installed once per process.
///
/// # Errors
///
/// Returns [`RewriteError::ActivationsAlreadyInstalled`] on a second call.
pub fn install(set: ActivationSet) -> Result<&'static ActivationSet> {
    INSTALLED
        .set(set)
        .map_err(|_| RewriteError::ActivationsAlreadyInstalled)?;
    installed().ok_or(RewriteError::ActivationsAlreadyInstalled)
}

/// The installed activation set, if any.
#[must_use]
pub fn installed() -> Option<&'static ActivationSet> {
    INSTALLED.get()
}
