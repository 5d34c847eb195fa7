//! Lenient semver-like version parsing and comparison.
//!
//! Mod authors publish versions in loosely semver-shaped forms: `1.2.3`,
//! `v1.2.3`, `1.2`, `1`, `1.2.3-beta.1+build.5`. Missing components default
//! to `0`. Ordering:
//! - `(major, minor, patch)` compare numerically
//! - a release outranks any prerelease of the same core version
//! - two prereleases compare as plain strings
//! - build metadata never participates

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ResolutionError;

/// A parsed mod version.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: String,
    pub build: String,
    /// The input with any leading `v` removed.
    pub raw: String,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: String::new(),
            build: String::new(),
            raw: format!("{major}.{minor}.{patch}"),
        }
    }

    pub fn parse(s: &str) -> Result<Self, ResolutionError> {
        parse_version(s)
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }
}

/// Parse a version string.
///
/// Fails with `InvalidConstraint` on an empty string, a non-numeric
/// component, or more than three dot-separated components.
pub fn parse_version(s: &str) -> Result<Version, ResolutionError> {
    let trimmed = s.trim();
    let raw = trimmed.strip_prefix('v').unwrap_or(trimmed);
    if raw.is_empty() {
        return Err(ResolutionError::invalid_constraint(format!(
            "empty version string '{s}'"
        )));
    }

    // Build metadata is outermost, so it is split off first.
    let (rest, build) = raw.split_once('+').unwrap_or((raw, ""));
    let (core, prerelease) = rest.split_once('-').unwrap_or((rest, ""));

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 {
        return Err(ResolutionError::invalid_constraint(format!(
            "version '{raw}' has more than three numeric components"
        )));
    }

    let component = |idx: usize, name: &str| -> Result<u64, ResolutionError> {
        match parts.get(idx) {
            None => Ok(0),
            Some(p) => p.parse::<u64>().map_err(|_| {
                ResolutionError::invalid_constraint(format!(
                    "invalid {name} component '{p}' in version '{raw}'"
                ))
            }),
        }
    };

    Ok(Version {
        major: component(0, "major")?,
        minor: component(1, "minor")?,
        patch: component(2, "patch")?,
        prerelease: prerelease.to_string(),
        build: build.to_string(),
        raw: raw.to_string(),
    })
}

/// Compare two versions, ignoring build metadata.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| match (a.is_prerelease(), b.is_prerelease()) {
            (false, false) => Ordering::Equal,
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (true, true) => a.prerelease.cmp(&b.prerelease),
        })
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
