use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use craftpack_util::errors::CraftpackError;

/// Global user configuration loaded from `~/.craftpack/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

/// Tie-break rule used when several versions satisfy a constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest matching version.
    #[default]
    Latest,
    /// Lowest matching version.
    Minimal,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Latest => "latest",
            Self::Minimal => "minimal",
        })
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "minimal" => Ok(Self::Minimal),
            other => Err(format!(
                "unknown strategy '{other}' (expected latest or minimal)"
            )),
        }
    }
}

/// Resolver defaults from `[resolver]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_true", rename = "include-optional")]
    pub include_optional: bool,
    /// `0` means unlimited.
    #[serde(default, rename = "max-depth")]
    pub max_depth: usize,
    #[serde(default = "default_true", rename = "reuse-cache")]
    pub reuse_cache: bool,
    /// Concurrent resolutions when resolving a whole pack.
    #[serde(default = "default_jobs")]
    pub jobs: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            include_optional: true,
            max_depth: 0,
            reuse_cache: true,
            jobs: default_jobs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_jobs() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(4)
}

/// Mod index location from `[index]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub path: Option<String>,
}

impl GlobalConfig {
    /// Load `~/.craftpack/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load a config file from an explicit path, or return defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            tracing::debug!("no global config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| CraftpackError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            CraftpackError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the craftpack data directory (`~/.craftpack/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".craftpack")
}
