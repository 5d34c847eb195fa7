use craftpack_core::dependency::Dependency;
use craftpack_core::manifest::Manifest;
use craftpack_core::mod_info::ModInfo;
use craftpack_resolver::validate::{
    has_errors, validate_availability, validate_dependencies, ValidationType,
};
use craftpack_resolver::IndexProvider;

#[test]
fn conflicting_ranges_for_one_mod() {
    let results = validate_dependencies(&[
        Dependency::required("x", ">=2.0.0"),
        Dependency::required("x", "<1.5.0"),
    ]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, ValidationType::Conflict);
    assert_eq!(results[0].mod_id, "x");
}

#[test]
fn pinned_version_outside_range() {
    let results = validate_dependencies(&[
        Dependency::required("lib", "=1.0.0"),
        Dependency::required("lib", ">=1.2.0 <2.0.0"),
    ]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, ValidationType::Conflict);
}

#[test]
fn touching_bounds() {
    let inclusive = validate_dependencies(&[
        Dependency::required("lib", ">=1.0.0"),
        Dependency::required("lib", "<=1.0.0"),
    ]);
    assert!(inclusive.is_empty());

    let strict = validate_dependencies(&[
        Dependency::required("lib", ">1.0.0"),
        Dependency::required("lib", "<=1.0.0"),
    ]);
    assert_eq!(strict.len(), 1);
}

#[test]
fn results_are_ordered_by_mod_id() {
    let results = validate_dependencies(&[
        Dependency::required("zeta", ">=2.0.0"),
        Dependency::required("zeta", "<1.0.0"),
        Dependency::required("alpha", ">=3.0.0"),
        Dependency::required("alpha", "<2.0.0"),
    ]);
    let ids: Vec<&str> = results.iter().map(|r| r.mod_id.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "zeta"]);
}

#[test]
fn manifest_dependencies_are_checked() {
    let manifest = Manifest::parse_toml(
        r#"
[package]
name = "pack"
version = "1.0.0"

[dependencies]
sodium = ">=0.5.0"
optifine = { type = "incompatible" }
iris = { version = ">=1.6.0", type = "optional" }
"#,
    )
    .unwrap();
    let mut deps = manifest.dependencies();
    deps.push(Dependency::required("optifine", ""));

    let results = validate_dependencies(&deps);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, ValidationType::Incompatible);
    assert_eq!(results[0].mod_id, "optifine");
    assert!(has_errors(&results));
}

#[test]
fn availability_against_index() {
    let provider = IndexProvider::from_mods([
        ModInfo::new("sodium", "0.5.3"),
        ModInfo::new("fabric-api", "0.90.0"),
    ]);
    let deps = [
        Dependency::required("sodium", ">=0.5.0"),
        Dependency::required("fabric-api", ">=0.92.0"),
        Dependency::optional("iris", ""),
    ];
    let results = validate_availability(&deps, &provider);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, ValidationType::Missing);
    assert_eq!(results[0].mod_id, "fabric-api");
}

#[test]
fn results_serialize_with_type_field() {
    let results = validate_dependencies(&[
        Dependency::required("x", ">=2.0.0"),
        Dependency::required("x", "<1.0.0"),
    ]);
    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json[0]["type"], "conflict");
    assert_eq!(json[0]["mod_id"], "x");
}
