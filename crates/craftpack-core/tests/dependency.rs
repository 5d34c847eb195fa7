use craftpack_core::dependency::{Dependency, DependencySpec, DependencyType, LoaderType};
use craftpack_core::mod_info::ModInfo;

#[test]
fn dependency_type_default_is_required() {
    assert_eq!(DependencyType::default(), DependencyType::Required);
}

#[test]
fn dependency_type_parse_and_display() {
    for kind in [
        DependencyType::Required,
        DependencyType::Optional,
        DependencyType::Incompatible,
        DependencyType::Embedded,
    ] {
        assert_eq!(kind.to_string().parse::<DependencyType>().unwrap(), kind);
    }
    assert!("recommended".parse::<DependencyType>().is_err());
}

#[test]
fn loader_type_parse_is_case_insensitive() {
    assert_eq!("NeoForge".parse::<LoaderType>().unwrap(), LoaderType::NeoForge);
    assert_eq!("fabric".parse::<LoaderType>().unwrap(), LoaderType::Fabric);
    assert!("liteloader".parse::<LoaderType>().is_err());
}

#[test]
fn loader_type_serializes_lowercase() {
    #[derive(serde::Serialize)]
    struct Wrapper {
        loader: LoaderType,
    }
    let s = toml::to_string(&Wrapper {
        loader: LoaderType::NeoForge,
    })
    .unwrap();
    assert_eq!(s.trim(), "loader = \"neoforge\"");
}

#[test]
fn unconstrained_dependency() {
    assert!(Dependency::required("a", "").is_unconstrained());
    assert!(Dependency::required("a", " * ").is_unconstrained());
    assert!(!Dependency::required("a", ">=1.0.0").is_unconstrained());
}

#[test]
fn dependency_display() {
    assert_eq!(
        Dependency::optional("jei", ">=15.0.0").to_string(),
        "jei >=15.0.0 (optional)"
    );
    assert_eq!(Dependency::required("jei", "").to_string(), "jei (required)");
}

#[test]
fn dependency_spec_short_is_required() {
    let deps = DependencySpec::Short(">=1.0.0".to_string()).to_dependencies("sodium");
    assert_eq!(deps, vec![Dependency::required("sodium", ">=1.0.0")]);
}

#[test]
fn dependency_spec_array_keeps_every_constraint() {
    #[derive(serde::Deserialize)]
    struct Table {
        lib: DependencySpec,
    }
    let table: Table =
        toml::from_str(r#"lib = [">=2.0.0", { version = "<1.5.0", type = "optional" }]"#).unwrap();
    assert_eq!(
        table.lib.to_dependencies("lib"),
        vec![
            Dependency::required("lib", ">=2.0.0"),
            Dependency::optional("lib", "<1.5.0"),
        ]
    );

    let pair: Table = toml::from_str(r#"lib = [">=1.0.0", "optional"]"#).unwrap();
    assert_eq!(pair.lib.to_dependencies("lib").len(), 2);
}

#[test]
fn mod_info_deserializes_from_toml() {
    let info: ModInfo = toml::from_str(
        r#"
id = "create"
name = "Create"
version = "0.5.1"
download-url = "https://example.invalid/create-0.5.1.jar"
minecraft-version = "1.20.1"

[[dependencies]]
id = "flywheel"
version = ">=0.6.0 <0.7.0"
type = "embedded"

[[dependencies]]
id = "jei"

[[loaders]]
loader = "forge"
version = ">=47.0.0"
"#,
    )
    .unwrap();
    assert_eq!(info.key(), "create@0.5.1");
    assert_eq!(info.dependencies.len(), 2);
    assert_eq!(info.dependencies[0].kind, DependencyType::Embedded);
    assert_eq!(info.dependencies[1].kind, DependencyType::Required);
    assert!(info.dependencies[1].version_constraint.is_empty());
    assert_eq!(info.loader_requirements[0].loader, LoaderType::Forge);
    assert_eq!(info.minecraft_version, "1.20.1");
}

#[test]
fn mod_info_builders() {
    let info = ModInfo::new("a", "1.0.0")
        .with_dependency(Dependency::required("b", ">=1.0.0"))
        .with_loader(LoaderType::Fabric, ">=0.14.0");
    assert_eq!(info.to_string(), "a@1.0.0");
    assert_eq!(info.dependencies.len(), 1);
    assert_eq!(info.loader_requirements.len(), 1);
}
