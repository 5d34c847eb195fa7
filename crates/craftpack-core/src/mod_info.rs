use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dependency::{Dependency, LoaderRequirement, LoaderType};

/// Metadata for one version of a mod, as supplied by a metadata provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default, rename = "download-url")]
    pub download_url: String,
    #[serde(default, rename = "loaders")]
    pub loader_requirements: Vec<LoaderRequirement>,
    #[serde(default, rename = "minecraft-version")]
    pub minecraft_version: String,
}

impl ModInfo {
    pub fn new(id: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            version: version.to_string(),
            ..Self::default()
        }
    }

    /// Builder-style helper to append a dependency.
    pub fn with_dependency(mut self, dep: Dependency) -> Self {
        self.dependencies.push(dep);
        self
    }

    /// Builder-style helper to append a loader requirement.
    pub fn with_loader(mut self, loader: LoaderType, version_constraint: &str) -> Self {
        self.loader_requirements
            .push(LoaderRequirement::new(loader, version_constraint));
        self
    }

    /// `id@version`, the identity used for caching and deduplication.
    pub fn key(&self) -> String {
        format!("{}@{}", self.id, self.version)
    }
}

impl fmt::Display for ModInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}
