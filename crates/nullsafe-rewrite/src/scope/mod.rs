//! Scope activations and their resolution.
//!
//! Every rewrite is opt-in per declaration. An activation names a package,
//! type or function by dotted path, says whether it covers everything
//! beneath that path, and which [`Feature`] it turns on. Before rewriting a
//! declaration the driver builds its [`DeclScope`] and asks the
//! [`ActivationSet`] which features apply, once per declaration.

mod activation;
mod set;

pub use activation::{ScopeActivation, parse_directive};
pub use set::{ActivationSet, ActivationSetBuilder, install, installed};

use nullsafe_syntax::DotPath;
use std::fmt;
use std::str::FromStr;

/// A rewrite that can be enabled per scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    /// Expand `a?.b` and `a?.m()` into explicit null checks
    Navigation,
    /// Guard non-nullable parameters of public functions
    ApiGuard,
    /// Construct array literals as `SafeArray`
    SequenceWrap,
}

impl Feature {
    /// Every feature, in directive order.
    pub const ALL: [Feature; 3] = [Feature::Navigation, Feature::ApiGuard, Feature::SequenceWrap];

    /// Name used in `feature=path` directives.
    #[must_use]
    pub const fn directive_name(self) -> &'static str {
        match self {
            Feature::Navigation => "navigation",
            Feature::ApiGuard => "api",
            Feature::SequenceWrap => "array",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive_name())
    }
}

/// Error returned when a feature name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFeature(pub String);

impl fmt::Display for UnknownFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown feature `{}` (expected navigation, api, array or all)", self.0)
    }
}

impl std::error::Error for UnknownFeature {}

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "navigation" | "nav" => Ok(Feature::Navigation),
            "api" | "api_guard" | "guard" => Ok(Feature::ApiGuard),
            "array" | "sequence" => Ok(Feature::SequenceWrap),
            _ => Err(UnknownFeature(s.to_string())),
        }
    }
}

/// Features in effect for one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureSet {
    /// [`Feature::Navigation`]
    pub navigation: bool,
    /// [`Feature::ApiGuard`]
    pub api_guard: bool,
    /// [`Feature::SequenceWrap`]
    pub sequence_wrap: bool,
}

impl FeatureSet {
    /// Every feature on.
    pub const ALL: FeatureSet = FeatureSet {
        navigation: true,
        api_guard: true,
        sequence_wrap: true,
    };

    /// Returns whether `feature` is on.
    #[must_use]
    pub const fn contains(self, feature: Feature) -> bool {
        match feature {
            Feature::Navigation => self.navigation,
            Feature::ApiGuard => self.api_guard,
            Feature::SequenceWrap => self.sequence_wrap,
        }
    }

    /// Turns `feature` on.
    pub fn insert(&mut self, feature: Feature) {
        match feature {
            Feature::Navigation => self.navigation = true,
            Feature::ApiGuard => self.api_guard = true,
            Feature::SequenceWrap => self.sequence_wrap = true,
        }
    }

    /// Returns `true` if no feature is on.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.navigation || self.api_guard || self.sequence_wrap)
    }
}

/// Where a declaration sits: its package, its owning type (for methods) and
/// its own fully-qualified path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclScope {
    package: DotPath,
    owner: Option<DotPath>,
    item: DotPath,
}

impl DeclScope {
    /// Scope of a top-level item `name` in `package`.
    #[must_use]
    pub fn item(package: &DotPath, name: &str) -> Self {
        Self {
            package: package.clone(),
            owner: None,
            item: package.child(name),
        }
    }

    /// Scope of method `name` on type `owner` in `package`.
    #[must_use]
    pub fn method(package: &DotPath, owner: &str, name: &str) -> Self {
        let owner = package.child(owner);
        let item = owner.child(name);
        Self {
            package: package.clone(),
            owner: Some(owner),
            item,
        }
    }

    /// The declaration's own path, e.g. `app.util.job` or `app.Job.run`.
    #[must_use]
    pub fn path(&self) -> &DotPath {
        &self.item
    }

    /// The package the declaration lives in.
    #[must_use]
    pub fn package(&self) -> &DotPath {
        &self.package
    }

    /// The owning type, for methods.
    #[must_use]
    pub fn owner(&self) -> Option<&DotPath> {
        self.owner.as_ref()
    }

    /// Paths a non-recursive activation may name to cover this declaration:
    /// the item itself, its owning type, and its package.
    pub fn containers(&self) -> impl Iterator<Item = &DotPath> {
        std::iter::once(&self.item)
            .chain(self.owner.as_ref())
            .chain(std::iter::once(&self.package))
    }
}
