pub mod ops_check;
pub mod ops_resolve;
pub mod ops_tree;

use std::path::{Path, PathBuf};

use craftpack_core::config::GlobalConfig;
use craftpack_core::manifest::Manifest;
use craftpack_resolver::{IndexProvider, ResolutionOptions};
use craftpack_util::errors::CraftpackError;

/// Pack manifest file name, looked up in the project directory.
pub const MANIFEST_FILE: &str = "Craftpack.toml";

/// Mod index file name used when neither `--index` nor `[index] path` is set.
pub const INDEX_FILE: &str = "index.toml";

/// Where to read the mod index from: the explicit path, then the global
/// config, then `index.toml` next to the manifest.
pub fn find_index(
    explicit: Option<&Path>,
    config: &GlobalConfig,
    project_dir: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = &config.index.path {
        return Some(PathBuf::from(path));
    }
    let local = project_dir.join(INDEX_FILE);
    local.is_file().then_some(local)
}

/// Load `Craftpack.toml` from `project_dir` if there is one.
pub fn load_manifest_if_present(project_dir: &Path) -> miette::Result<Option<Manifest>> {
    let path = project_dir.join(MANIFEST_FILE);
    if path.is_file() {
        Manifest::from_path(&path).map(Some)
    } else {
        Ok(None)
    }
}

/// Inputs shared by the resolving operations.
pub struct Context {
    pub config: GlobalConfig,
    pub manifest: Option<Manifest>,
    pub provider: IndexProvider,
}

impl Context {
    /// Load the global config, the manifest (if any) and the mod index.
    ///
    /// Fails if no index can be found.
    pub fn load(project_dir: &Path, index: Option<&Path>) -> miette::Result<Self> {
        let config = GlobalConfig::load()?;
        let manifest = load_manifest_if_present(project_dir)?;
        let index_path =
            find_index(index, &config, project_dir).ok_or_else(|| CraftpackError::Index {
                message: format!("no mod index found in {}", project_dir.display()),
            })?;
        let provider = IndexProvider::from_path(&index_path)?;
        Ok(Self {
            config,
            manifest,
            provider,
        })
    }

    /// Resolver options from the config, targeted at the manifest's platform.
    pub fn resolution_options(&self) -> ResolutionOptions {
        ResolutionOptions::from_config(&self.config, self.manifest.as_ref())
    }
}
