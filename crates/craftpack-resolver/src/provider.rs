//! The metadata provider contract and an in-memory index implementation.
//!
//! The resolver never performs I/O itself. Everything it knows about a mod
//! comes through [`MetadataProvider`]; implementations own their transport,
//! caching, timeouts and retries.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use craftpack_core::mod_info::ModInfo;
use craftpack_util::errors::CraftpackError;
use serde::Deserialize;

use crate::constraint::parse_version_constraints;
use crate::error::ProviderError;
use crate::version::parse_version;

/// Source of mod metadata queried during resolution.
///
/// Implementations must tolerate concurrent calls: one resolver may serve
/// several resolutions on different threads.
pub trait MetadataProvider: Send + Sync {
    /// Metadata for one exact version.
    fn get_mod_info(&self, id: &str, version: &str) -> Result<ModInfo, ProviderError>;

    /// The newest version satisfying `constraint` (`*` for any).
    fn get_latest_version(&self, id: &str, constraint: &str) -> Result<ModInfo, ProviderError>;

    /// Every known version of a mod, in no particular order.
    fn get_all_versions(&self, id: &str) -> Result<Vec<ModInfo>, ProviderError>;
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for Arc<P> {
    fn get_mod_info(&self, id: &str, version: &str) -> Result<ModInfo, ProviderError> {
        (**self).get_mod_info(id, version)
    }

    fn get_latest_version(&self, id: &str, constraint: &str) -> Result<ModInfo, ProviderError> {
        (**self).get_latest_version(id, constraint)
    }

    fn get_all_versions(&self, id: &str) -> Result<Vec<ModInfo>, ProviderError> {
        (**self).get_all_versions(id)
    }
}

/// On-disk layout of a mod index: a list of `[[mod]]` tables.
#[derive(Debug, Deserialize)]
struct IndexFile {
    #[serde(default, rename = "mod")]
    mods: Vec<ModInfo>,
}

/// A provider backed by an in-memory list of mod versions.
///
/// Loadable from a TOML index file:
///
/// ```toml
/// [[mod]]
/// id = "sodium"
/// version = "0.5.3"
/// download-url = "https://example.invalid/sodium-0.5.3.jar"
///
/// [[mod.dependencies]]
/// id = "fabric-api"
/// version = ">=0.90.0"
///
/// [[mod.loaders]]
/// loader = "fabric"
/// version = ">=0.14.0"
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndexProvider {
    mods: BTreeMap<String, Vec<ModInfo>>,
}

impl IndexProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mods(mods: impl IntoIterator<Item = ModInfo>) -> Self {
        let mut provider = Self::new();
        for info in mods {
            provider.add(info);
        }
        provider
    }

    /// Register a mod version. A repeated `id@version` replaces the earlier entry.
    pub fn add(&mut self, info: ModInfo) {
        let versions = self.mods.entry(info.id.clone()).or_default();
        versions.retain(|m| m.version != info.version);
        versions.push(info);
    }

    /// Builder-style [`IndexProvider::add`].
    pub fn with(mut self, info: ModInfo) -> Self {
        self.add(info);
        self
    }

    /// Parse index TOML text.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        let file: IndexFile = toml::from_str(content).map_err(|e| CraftpackError::Index {
            message: e.to_string(),
        })?;
        Ok(Self::from_mods(file.mods))
    }

    /// Load an index file from disk.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CraftpackError::Index {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let provider = Self::parse_toml(&content)?;
        tracing::debug!(
            "loaded index {} ({} mods, {} versions)",
            path.display(),
            provider.mods.len(),
            provider.version_count()
        );
        Ok(provider)
    }

    /// Number of distinct mod ids.
    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn version_count(&self) -> usize {
        self.mods.values().map(Vec::len).sum()
    }

    fn versions(&self, id: &str) -> Result<&[ModInfo], ProviderError> {
        self.mods
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| ProviderError::not_found(id, None))
    }
}

impl MetadataProvider for IndexProvider {
    /// An exact version string wins. Otherwise the first entry that compares
    /// equal (`v1.5` for `1.5.0`) is returned; build metadata is ignored there.
    fn get_mod_info(&self, id: &str, version: &str) -> Result<ModInfo, ProviderError> {
        let versions = self.versions(id)?;
        if let Some(exact) = versions.iter().find(|m| m.version == version) {
            return Ok(exact.clone());
        }
        let wanted = parse_version(version)
            .map_err(|_| ProviderError::not_found(id, Some(version)))?;
        versions
            .iter()
            .find(|m| parse_version(&m.version).is_ok_and(|v| v == wanted))
            .cloned()
            .ok_or_else(|| ProviderError::not_found(id, Some(version)))
    }

    fn get_latest_version(&self, id: &str, constraint: &str) -> Result<ModInfo, ProviderError> {
        let constraints = parse_version_constraints(constraint)
            .map_err(|_| ProviderError::not_found(id, Some(constraint)))?;
        self.versions(id)?
            .iter()
            .filter_map(|m| parse_version(&m.version).ok().map(|v| (v, m)))
            .filter(|(v, _)| constraints.matches_all(v))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, m)| m.clone())
            .ok_or_else(|| ProviderError::not_found(id, Some(constraint)))
    }

    fn get_all_versions(&self, id: &str) -> Result<Vec<ModInfo>, ProviderError> {
        self.versions(id).map(<[ModInfo]>::to_vec)
    }
}
