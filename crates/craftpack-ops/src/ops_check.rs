//! Operation: statically validate a pack's declared dependencies.
//!
//! No resolution happens here. The `[dependencies]` and `[incompatible]`
//! tables are checked for contradictory constraints and, when a mod index is
//! available, for required mods that have no matching version at all.

use std::path::{Path, PathBuf};

use craftpack_core::config::GlobalConfig;
use craftpack_core::manifest::Manifest;
use craftpack_resolver::validate::{
    validate_availability, validate_dependencies, ValidationResult, ValidationType,
};
use craftpack_resolver::IndexProvider;
use craftpack_util::errors::CraftpackError;
use craftpack_util::progress;

use crate::{find_index, MANIFEST_FILE};

/// Options for `craftpack check`.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Manifest to check instead of `Craftpack.toml` in the project directory.
    pub manifest: Option<PathBuf>,
    pub index: Option<PathBuf>,
}

/// Validate the manifest and print every finding.
///
/// Fails if any conflict, incompatibility or missing mod is found; warnings
/// alone do not fail the check.
pub fn check(project_dir: &Path, opts: &CheckOptions) -> miette::Result<()> {
    let config = GlobalConfig::load()?;
    check_with_config(project_dir, opts, &config)
}

fn check_with_config(
    project_dir: &Path,
    opts: &CheckOptions,
    config: &GlobalConfig,
) -> miette::Result<()> {
    let manifest_path = opts
        .manifest
        .clone()
        .unwrap_or_else(|| project_dir.join(MANIFEST_FILE));
    let manifest = Manifest::from_path(&manifest_path)?;
    let deps = manifest.dependencies();
    progress::status(
        "Checking",
        &format!(
            "{} v{} ({} dependencies)",
            manifest.package.name,
            manifest.package.version,
            deps.len()
        ),
    );

    let mut results = validate_dependencies(&deps);

    match find_index(opts.index.as_deref(), config, project_dir) {
        Some(path) => {
            let provider = IndexProvider::from_path(&path)?;
            results.extend(validate_availability(&deps, &provider));
        }
        None => tracing::debug!("no mod index found, skipping availability check"),
    }

    for result in &results {
        print_result(result);
    }

    let errors = results.iter().filter(|r| r.kind.is_error()).count();
    if errors > 0 {
        return Err(CraftpackError::Resolution {
            message: format!("{errors} problem(s) found in {}", manifest_path.display()),
        }
        .into());
    }

    progress::status("Finished", "no dependency problems found");
    Ok(())
}

fn print_result(result: &ValidationResult) {
    let message = format!("{}: {}", result.mod_id, result.message);
    match result.kind {
        ValidationType::Warning => progress::status_warn("Warning", &message),
        ValidationType::Conflict => progress::status_error("Conflict", &message),
        ValidationType::Incompatible => progress::status_error("Incompatible", &message),
        ValidationType::Missing => progress::status_error("Missing", &message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join(MANIFEST_FILE);
        std::fs::write(
            &path,
            format!("[package]\nname = \"pack\"\nversion = \"1.0.0\"\n\n{body}"),
        )
        .unwrap();
        path
    }

    fn run(dir: &Path, opts: &CheckOptions) -> miette::Result<()> {
        check_with_config(dir, opts, &GlobalConfig::default())
    }

    #[test]
    fn clean_manifest_passes() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(tmp.path(), "[dependencies]\nsodium = \">=0.5.0\"\n");
        assert!(run(tmp.path(), &CheckOptions::default()).is_ok());
    }

    #[test]
    fn configured_index_is_used() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(tmp.path(), "[dependencies]\nsodium = \">=0.5.0\"\n");
        let mut config = GlobalConfig::default();
        config.index.path = Some(tmp.path().join("nope.toml").display().to_string());
        assert!(check_with_config(tmp.path(), &CheckOptions::default(), &config).is_err());
    }

    #[test]
    fn unreadable_index_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(tmp.path(), "[dependencies]\nsodium = \">=0.5.0\"\n");
        let opts = CheckOptions {
            index: Some(tmp.path().join("nope.toml")),
            ..CheckOptions::default()
        };
        assert!(run(tmp.path(), &opts).is_err());
    }

    #[test]
    fn contradictory_constraints_fail() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_manifest(
            tmp.path(),
            "[dependencies]\nlib = [\">=2.0.0\", \"<1.5.0\"]\n",
        );
        let opts = CheckOptions {
            manifest: Some(path),
            ..CheckOptions::default()
        };
        let err = run(tmp.path(), &opts).unwrap_err();
        assert!(err.to_string().contains("1 problem(s)"), "got: {err}");
    }

    #[test]
    fn dependency_declared_incompatible_fails() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(
            tmp.path(),
            "[dependencies]\noptifine = \">=1.0.0\"\n\n[incompatible]\noptifine = \"*\"\n",
        );
        let err = run(tmp.path(), &CheckOptions::default()).unwrap_err();
        assert!(err.to_string().contains("1 problem(s)"), "got: {err}");
    }

    #[test]
    fn incompatible_mod_alone_passes() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(
            tmp.path(),
            "[dependencies]\nsodium = \">=0.5.0\"\n\n[incompatible]\noptifine = \"*\"\n",
        );
        assert!(run(tmp.path(), &CheckOptions::default()).is_ok());
    }

    #[test]
    fn missing_mod_fails_with_index() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(tmp.path(), "[dependencies]\nsodium = \">=0.5.0\"\n");
        std::fs::write(
            tmp.path().join("index.toml"),
            "[[mod]]\nid = \"sodium\"\nversion = \"0.4.0\"\n",
        )
        .unwrap();
        let err = run(tmp.path(), &CheckOptions::default()).unwrap_err();
        assert!(err.to_string().contains("1 problem(s)"), "got: {err}");
    }
}
