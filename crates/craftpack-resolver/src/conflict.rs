//! Non-fatal problems collected during resolution.
//!
//! None of these abort a resolve; they travel on the returned
//! [`crate::graph::DependencyGraph`] for the caller to judge.

use std::fmt;

use craftpack_core::dependency::LoaderType;
use serde::Serialize;

/// A mod that ended up selected at more than one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionConflict {
    pub mod_id: String,
    /// Mods that requested `mod_id`, in first-seen order.
    pub required_by: Vec<String>,
    /// The constraint each requester used, parallel to `required_by`.
    pub constraints: Vec<String>,
}

/// Two mods that declare each other (or one the other) incompatible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompatiblePair {
    pub mod_a: String,
    pub mod_b: String,
    pub reason: String,
}

/// A mod whose loader requirements do not fit the target loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoaderConflict {
    pub mod_id: String,
    /// `None` when the mod does not declare the target loader at all.
    pub required_loader: Option<LoaderType>,
    pub required_version: String,
    pub target_loader: LoaderType,
    pub target_version: String,
    pub reason: String,
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requests: Vec<String> = self
            .required_by
            .iter()
            .zip(&self.constraints)
            .map(|(by, c)| {
                if c.is_empty() {
                    format!("{by} (*)")
                } else {
                    format!("{by} ({c})")
                }
            })
            .collect();
        write!(
            f,
            "version conflict for {}: requested by {}",
            self.mod_id,
            requests.join(", ")
        )
    }
}

impl fmt::Display for IncompatiblePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is incompatible with {}: {}",
            self.mod_a, self.mod_b, self.reason
        )
    }
}

impl fmt::Display for LoaderConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loader mismatch for {}: {}", self.mod_id, self.reason)
    }
}
