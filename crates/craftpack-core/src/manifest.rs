use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use craftpack_util::errors::CraftpackError;

use crate::dependency::{Dependency, DependencySpec, LoaderType};

/// The parsed representation of a `Craftpack.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub package: PackMetadata,

    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,

    /// Mods that must not be installed alongside the pack, mapped to the
    /// offending version range (`"*"` or `""` for every version).
    #[serde(default)]
    pub incompatible: BTreeMap<String, String>,
}

/// Pack identity and target platform from the `[package]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Minecraft version the pack targets, e.g. `1.20.1`.
    #[serde(default)]
    pub minecraft: Option<String>,
    #[serde(default)]
    pub loader: Option<LoaderType>,
    #[serde(default, rename = "loader-version")]
    pub loader_version: Option<String>,
}

impl Manifest {
    /// Load and parse a `Craftpack.toml` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CraftpackError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let manifest = Self::parse_toml(&content)?;
        tracing::debug!(
            "loaded manifest {} v{} ({} dependencies, {} incompatible)",
            manifest.package.name,
            manifest.package.version,
            manifest.dependencies.len(),
            manifest.incompatible.len()
        );
        Ok(manifest)
    }

    /// Parse manifest TOML text.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            CraftpackError::Manifest {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// `[dependencies]` and `[incompatible]` flattened into one list, ordered
    /// by mod id. Entries for the same id keep their declaration order, with
    /// `[incompatible]` entries last.
    pub fn dependencies(&self) -> Vec<Dependency> {
        let mut deps: Vec<Dependency> = self
            .dependencies
            .iter()
            .flat_map(|(id, spec)| spec.to_dependencies(id))
            .chain(
                self.incompatible
                    .iter()
                    .map(|(id, range)| Dependency::incompatible(id, range)),
            )
            .collect();
        deps.sort_by(|a, b| a.id.cmp(&b.id));
        deps
    }
}
