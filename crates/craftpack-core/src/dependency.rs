use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a mod relates to one of its declared dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    /// Must be present; resolution fails without it.
    #[default]
    Required,
    /// Installed when available and optional dependencies are enabled.
    Optional,
    /// Must not be installed alongside the declaring mod.
    Incompatible,
    /// Bundled inside the declaring mod's jar, never fetched.
    Embedded,
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Incompatible => "incompatible",
            Self::Embedded => "embedded",
        })
    }
}

impl FromStr for DependencyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "optional" => Ok(Self::Optional),
            "incompatible" => Ok(Self::Incompatible),
            "embedded" => Ok(Self::Embedded),
            other => Err(format!("unknown dependency type '{other}'")),
        }
    }
}

/// A dependency declared by a mod: target id, version constraint and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: String,
    /// Constraint expression such as `>=1.2.0 <2.0.0`; empty or `*` matches anything.
    #[serde(default, rename = "version")]
    pub version_constraint: String,
    #[serde(default, rename = "type")]
    pub kind: DependencyType,
}

impl Dependency {
    pub fn new(id: &str, version_constraint: &str, kind: DependencyType) -> Self {
        Self {
            id: id.to_string(),
            version_constraint: version_constraint.to_string(),
            kind,
        }
    }

    pub fn required(id: &str, version_constraint: &str) -> Self {
        Self::new(id, version_constraint, DependencyType::Required)
    }

    pub fn optional(id: &str, version_constraint: &str) -> Self {
        Self::new(id, version_constraint, DependencyType::Optional)
    }

    pub fn incompatible(id: &str, version_constraint: &str) -> Self {
        Self::new(id, version_constraint, DependencyType::Incompatible)
    }

    pub fn embedded(id: &str, version: &str) -> Self {
        Self::new(id, version, DependencyType::Embedded)
    }

    /// `true` when the constraint is empty or the `*` wildcard.
    pub fn is_unconstrained(&self) -> bool {
        let c = self.version_constraint.trim();
        c.is_empty() || c == "*"
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unconstrained() {
            write!(f, "{} ({})", self.id, self.kind)
        } else {
            write!(f, "{} {} ({})", self.id, self.version_constraint, self.kind)
        }
    }
}

/// Mod-loading framework a mod targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderType {
    Forge,
    Fabric,
    NeoForge,
    Sponge,
    Quilt,
}

impl LoaderType {
    pub const ALL: [LoaderType; 5] = [
        Self::Forge,
        Self::Fabric,
        Self::NeoForge,
        Self::Sponge,
        Self::Quilt,
    ];
}

impl fmt::Display for LoaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forge => "Forge",
            Self::Fabric => "Fabric",
            Self::NeoForge => "NeoForge",
            Self::Sponge => "Sponge",
            Self::Quilt => "Quilt",
        })
    }
}

impl FromStr for LoaderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forge" => Ok(Self::Forge),
            "fabric" => Ok(Self::Fabric),
            "neoforge" => Ok(Self::NeoForge),
            "sponge" => Ok(Self::Sponge),
            "quilt" => Ok(Self::Quilt),
            other => Err(format!(
                "unknown loader '{other}' (expected forge, fabric, neoforge, sponge or quilt)"
            )),
        }
    }
}

/// A loader a mod runs on, with the loader versions it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderRequirement {
    pub loader: LoaderType,
    #[serde(default, rename = "version")]
    pub version_constraint: String,
}

impl LoaderRequirement {
    pub fn new(loader: LoaderType, version_constraint: &str) -> Self {
        Self {
            loader,
            version_constraint: version_constraint.to_string(),
        }
    }
}

/// A dependency entry in the `[dependencies]` table of `Craftpack.toml`.
///
/// Supports shorthand (`"mod-id" = ">=1.0.0"`), detailed tables, and an array
/// of either when several constraints on one mod must hold together
/// (`"mod-id" = [">=1.0.0", { version = "<2.0.0", type = "optional" }]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Short(String),
    /// Listed ahead of `Detailed`, which would also accept a sequence.
    Multiple(Vec<DependencySpec>),
    Detailed(DetailedDependency),
}

/// A dependency with an explicit constraint and type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedDependency {
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: DependencyType,
}

impl DependencySpec {
    /// Turn a manifest entry into [`Dependency`] values on the given mod id,
    /// one per declared constraint.
    pub fn to_dependencies(&self, id: &str) -> Vec<Dependency> {
        match self {
            Self::Short(constraint) => vec![Dependency::required(id, constraint)],
            Self::Multiple(specs) => specs.iter().flat_map(|s| s.to_dependencies(id)).collect(),
            Self::Detailed(d) => vec![Dependency::new(id, &d.version, d.kind)],
        }
    }
}
