//! Static checks over a declared dependency list, without resolving it.
//!
//! [`validate_dependencies`] needs no provider and is cheap enough to run on
//! every manifest load. [`validate_availability`] additionally asks a
//! provider whether each required dependency can be satisfied at all.

use std::collections::BTreeMap;
use std::fmt;

use craftpack_core::dependency::{Dependency, DependencyType};
use serde::Serialize;

use crate::constraint::{is_compatible, parse_version_constraints, VersionConstraints};
use crate::provider::MetadataProvider;
use crate::version::parse_version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationType {
    Conflict,
    Incompatible,
    Missing,
    Warning,
}

impl ValidationType {
    /// `true` for results that should fail a check.
    pub fn is_error(self) -> bool {
        !matches!(self, Self::Warning)
    }
}

impl fmt::Display for ValidationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Conflict => "conflict",
            Self::Incompatible => "incompatible",
            Self::Missing => "missing",
            Self::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    #[serde(rename = "type")]
    pub kind: ValidationType,
    pub mod_id: String,
    pub message: String,
}

impl ValidationResult {
    fn new(kind: ValidationType, mod_id: &str, message: String) -> Self {
        Self {
            kind,
            mod_id: mod_id.to_string(),
            message,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.mod_id, self.kind, self.message)
    }
}

/// Check a flat list of declared dependencies for contradictions.
///
/// Results come grouped by mod id in id order: unparseable constraints
/// (`Warning`), then pairwise incompatible constraints (`Conflict`), then an
/// id that is both depended on and declared incompatible (`Incompatible`).
pub fn validate_dependencies(deps: &[Dependency]) -> Vec<ValidationResult> {
    let mut by_id: BTreeMap<&str, Vec<&Dependency>> = BTreeMap::new();
    for dep in deps {
        by_id.entry(dep.id.as_str()).or_default().push(dep);
    }

    let mut results = Vec::new();
    for (id, entries) in &by_id {
        let mut constraints: Vec<VersionConstraints> = Vec::new();
        for dep in entries {
            if dep.kind == DependencyType::Incompatible || dep.kind == DependencyType::Embedded {
                continue;
            }
            match parse_version_constraints(&dep.version_constraint) {
                Ok(parsed) if parsed.is_any() => {}
                Ok(parsed) => {
                    if !constraints.iter().any(|c| c.raw == parsed.raw) {
                        constraints.push(parsed);
                    }
                }
                Err(err) => results.push(ValidationResult::new(
                    ValidationType::Warning,
                    id,
                    format!(
                        "ignoring unparseable constraint '{}': {}",
                        dep.version_constraint, err.message
                    ),
                )),
            }
        }

        for (i, a) in constraints.iter().enumerate() {
            for b in &constraints[i + 1..] {
                if !is_compatible(a, b) {
                    results.push(ValidationResult::new(
                        ValidationType::Conflict,
                        id,
                        format!("constraints '{a}' and '{b}' cannot both be satisfied"),
                    ));
                }
            }
        }

        let incompatible = entries
            .iter()
            .any(|d| d.kind == DependencyType::Incompatible);
        let depended_on = entries.iter().any(|d| {
            d.kind == DependencyType::Required
                || (d.kind != DependencyType::Incompatible && !d.is_unconstrained())
        });
        if incompatible && depended_on {
            results.push(ValidationResult::new(
                ValidationType::Incompatible,
                id,
                format!("'{id}' is declared both as a dependency and as incompatible"),
            ));
        }
    }
    results
}

/// Ask `provider` for a version of every required dependency.
///
/// Each required dependency with no matching version yields a `Missing`
/// result. Dependencies whose constraint does not parse are left to
/// [`validate_dependencies`].
pub fn validate_availability<P>(deps: &[Dependency], provider: &P) -> Vec<ValidationResult>
where
    P: MetadataProvider + ?Sized,
{
    let mut results = Vec::new();
    for dep in deps.iter().filter(|d| d.kind == DependencyType::Required) {
        let Ok(constraints) = parse_version_constraints(&dep.version_constraint) else {
            continue;
        };
        let available = match provider.get_all_versions(&dep.id) {
            Ok(versions) => versions.iter().any(|m| {
                parse_version(&m.version).is_ok_and(|v| constraints.matches_all(&v))
                    || (constraints.is_any() && !m.version.is_empty())
            }),
            Err(err) => {
                tracing::debug!("availability lookup for {} failed: {err}", dep.id);
                false
            }
        };
        if !available {
            results.push(ValidationResult::new(
                ValidationType::Missing,
                &dep.id,
                format!("no available version of '{}' matches {constraints}", dep.id),
            ));
        }
    }
    results
}

/// `true` if any result should fail a check.
pub fn has_errors(results: &[ValidationResult]) -> bool {
    results.iter().any(|r| r.kind.is_error())
}
