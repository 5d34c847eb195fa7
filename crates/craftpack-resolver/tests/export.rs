use craftpack_core::dependency::Dependency;
use craftpack_core::mod_info::ModInfo;
use craftpack_resolver::dot::generate_graph;
use craftpack_resolver::{DependencyGraph, IndexProvider, ResolutionOptions, Resolver};

fn pack_index() -> IndexProvider {
    IndexProvider::from_mods([
        ModInfo::new("pack", "1.0.0")
            .with_dependency(Dependency::required("sodium", ">=0.5.0"))
            .with_dependency(Dependency::required("iris", ""))
            .with_dependency(Dependency::optional("modmenu", "")),
        ModInfo::new("sodium", "0.5.3").with_dependency(Dependency::required("fabric-api", "")),
        ModInfo::new("iris", "1.6.11")
            .with_dependency(Dependency::required("sodium", ">=0.5.0"))
            .with_dependency(Dependency::embedded("glsl-transformer", "2.0.0")),
        ModInfo::new("modmenu", "7.2.2").with_dependency(Dependency::required("fabric-api", "")),
        ModInfo::new("fabric-api", "0.92.0"),
    ])
}

fn resolve_pack() -> DependencyGraph {
    Resolver::new(pack_index(), ResolutionOptions::default())
        .resolve("pack", "1.0.0")
        .unwrap()
}

#[test]
fn dot_output_is_stable_across_resolutions() {
    let first = resolve_pack().to_dot();
    let second = resolve_pack().to_dot();
    assert_eq!(first, second);
    assert_eq!(generate_graph(&resolve_pack()), first);
}

#[test]
fn dot_output_for_resolved_pack() {
    let dot = resolve_pack().to_dot();
    let expected = r#"digraph dependencies {
    rankdir=LR;
    node [shape=box];

    "pack@1.0.0" [label="pack\n1.0.0", color=black];
    "sodium@0.5.3" [label="sodium\n0.5.3", color=black];
    "fabric-api@0.92.0" [label="fabric-api\n0.92.0", color=black];
    "iris@1.6.11" [label="iris\n1.6.11", color=black];
    "glsl-transformer@2.0.0" [label="glsl-transformer\n2.0.0", color=blue];
    "modmenu@7.2.2" [label="modmenu\n7.2.2", color=gray];

    "pack@1.0.0" -> "sodium@0.5.3" [style=solid];
    "sodium@0.5.3" -> "fabric-api@0.92.0" [style=solid];
    "pack@1.0.0" -> "iris@1.6.11" [style=solid];
    "iris@1.6.11" -> "sodium@0.5.3" [style=solid];
    "iris@1.6.11" -> "glsl-transformer@2.0.0" [style=solid];
    "pack@1.0.0" -> "modmenu@7.2.2" [style=dashed];
    "modmenu@7.2.2" -> "fabric-api@0.92.0" [style=solid];
}
"#;
    assert_eq!(dot, expected);
}

#[test]
fn tree_and_path() {
    let graph = resolve_pack();
    let tree = graph.print_tree(None);
    let expected = "\
pack@1.0.0
├── sodium@0.5.3
│   └── fabric-api@0.92.0
├── iris@1.6.11
│   ├── sodium@0.5.3
│   │   └── fabric-api@0.92.0
│   └── glsl-transformer@2.0.0 (embedded)
└── modmenu@7.2.2 (optional)
    └── fabric-api@0.92.0
";
    assert_eq!(tree, expected);

    let path: Vec<String> = graph
        .find_path("fabric-api")
        .unwrap()
        .iter()
        .map(|n| n.key())
        .collect();
    assert_eq!(path, vec!["pack@1.0.0", "sodium@0.5.3", "fabric-api@0.92.0"]);
}

#[test]
fn json_export_contains_every_mod() {
    let graph = resolve_pack();
    let value: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
    let ids: Vec<&str> = value["all_mods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["pack", "sodium", "fabric-api", "iris", "glsl-transformer", "modmenu"]
    );
    assert_eq!(value["conflicts"].as_array().unwrap().len(), 0);
}
