//! Configuration checks that run alongside the rewrite.

use crate::error::RewriteError;
use crate::scope::ActivationSet;
use hashbrown::HashSet;
use nullsafe_syntax::ast::CompilationUnit;
use nullsafe_syntax::{DotPath, StringInterner};

/// Reports activations whose path no unit declares as a package, type or
/// function.
///
/// Unresolved activations are configuration errors: they are reported, but
/// they never stop a build and have no effect on rewriting.
#[must_use]
pub fn validate_activations(
    set: &ActivationSet,
    units: &[CompilationUnit],
    interner: &StringInterner,
) -> Vec<RewriteError> {
    let mut declared: HashSet<DotPath> = HashSet::new();
    for unit in units {
        unit.for_each_declared_path(interner, |path| {
            declared.insert(path);
        });
    }

    set.iter()
        .filter(|activation| !declared.contains(&activation.path))
        .map(|activation| RewriteError::UnresolvedActivation {
            activation: activation.clone(),
        })
        .collect()
}
