//! Graphviz DOT export of a resolved dependency graph.
//!
//! The resolved tree is folded into a `petgraph` arena with one node per
//! `id@version`. Nodes and edges are emitted in insertion order, which follows
//! the pre-order walk of the tree, so the output is stable across runs.

use std::collections::{HashMap, HashSet};

use craftpack_core::dependency::DependencyType;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::graph::{DependencyGraph, ResolvedDependency};

const CONFLICT_FILL: &str = "#f4cccc";

struct DotNode {
    key: String,
    id: String,
    version: String,
    kind: DependencyType,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DotEdge {
    Requires { optional: bool },
    Incompatible,
}

struct Arena {
    graph: DiGraph<DotNode, DotEdge>,
    index: HashMap<String, NodeIndex>,
}

impl Arena {
    fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Add or retrieve the node for a resolved mod.
    fn add_node(&mut self, dep: &ResolvedDependency) -> NodeIndex {
        let key = dep.key();
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(DotNode {
            key: key.clone(),
            id: dep.id.clone(),
            version: dep.version.clone(),
            kind: dep.kind,
        });
        self.index.insert(key, idx);
        idx
    }

    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: DotEdge) {
        let exists = self
            .graph
            .edges(from)
            .any(|e| e.target() == to && *e.weight() == edge);
        if !exists {
            self.graph.add_edge(from, to, edge);
        }
    }

    fn add_subtree(&mut self, node: &ResolvedDependency, idx: NodeIndex) {
        for child in &node.dependencies {
            let child_idx = self.add_node(child);
            self.add_edge(
                idx,
                child_idx,
                DotEdge::Requires {
                    optional: child.is_optional,
                },
            );
            self.add_subtree(child, child_idx);
        }
    }

    /// First node (insertion order) with the given mod id, or a bare node
    /// keyed by the id when the mod never made it into the tree.
    fn node_for_id(&mut self, id: &str) -> NodeIndex {
        if let Some(idx) = self.graph.node_indices().find(|&i| self.graph[i].id == id) {
            return idx;
        }
        let idx = self.graph.add_node(DotNode {
            key: id.to_string(),
            id: id.to_string(),
            version: "?".to_string(),
            kind: DependencyType::Incompatible,
        });
        self.index.insert(id.to_string(), idx);
        idx
    }
}

/// Render the graph as DOT text.
///
/// Node colors: black (required), gray (optional), blue (embedded). Required
/// edges are solid, optional edges dashed. Mods named in a version conflict
/// are filled; incompatible pairs become dashed red edges.
pub fn generate_graph(graph: &DependencyGraph) -> String {
    let mut arena = Arena::new();
    let root = arena.add_node(&graph.root);
    arena.add_subtree(&graph.root, root);

    for pair in &graph.incompatibles {
        let a = arena.node_for_id(&pair.mod_a);
        let b = arena.node_for_id(&pair.mod_b);
        arena.add_edge(a, b, DotEdge::Incompatible);
    }

    let conflicted: HashSet<&str> = graph.conflicts.iter().map(|c| c.mod_id.as_str()).collect();

    let mut out = String::new();
    out.push_str("digraph dependencies {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [shape=box];\n\n");

    for idx in arena.graph.node_indices() {
        let node = &arena.graph[idx];
        let color = match node.kind {
            DependencyType::Optional => "gray",
            DependencyType::Embedded => "blue",
            DependencyType::Incompatible => "red",
            DependencyType::Required => "black",
        };
        out.push_str(&format!(
            "    \"{}\" [label=\"{}\\n{}\", color={color}",
            escape(&node.key),
            escape(&node.id),
            escape(&node.version)
        ));
        if conflicted.contains(node.id.as_str()) {
            out.push_str(&format!(", style=filled, fillcolor=\"{CONFLICT_FILL}\""));
        }
        out.push_str("];\n");
    }

    if arena.graph.edge_count() > 0 {
        out.push('\n');
    }
    for edge in arena.graph.edge_references() {
        let from = escape(&arena.graph[edge.source()].key);
        let to = escape(&arena.graph[edge.target()].key);
        let attrs = match edge.weight() {
            DotEdge::Requires { optional: false } => "style=solid",
            DotEdge::Requires { optional: true } => "style=dashed",
            DotEdge::Incompatible => "color=red, style=dashed, label=\"incompatible\"",
        };
        out.push_str(&format!("    \"{from}\" -> \"{to}\" [{attrs}];\n"));
    }

    out.push_str("}\n");
    out
}

/// Escape text for a quoted DOT id or label.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl DependencyGraph {
    /// DOT text for this graph; see [`generate_graph`].
    pub fn to_dot(&self) -> String {
        generate_graph(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{IncompatiblePair, VersionConflict};

    fn node(
        id: &str,
        version: &str,
        kind: DependencyType,
        children: Vec<ResolvedDependency>,
    ) -> ResolvedDependency {
        ResolvedDependency {
            id: id.to_string(),
            version: version.to_string(),
            download_url: String::new(),
            kind,
            dependencies: children,
            is_optional: kind == DependencyType::Optional,
        }
    }

    #[test]
    fn simple_graph_output() {
        let root = node(
            "a",
            "1.0.0",
            DependencyType::Required,
            vec![
                node("b", "1.2.0", DependencyType::Required, vec![]),
                node("c", "0.3.0", DependencyType::Optional, vec![]),
                node("d", "2.0", DependencyType::Embedded, vec![]),
            ],
        );
        let dot = generate_graph(&DependencyGraph::new(root));
        let expected = r#"digraph dependencies {
    rankdir=LR;
    node [shape=box];

    "a@1.0.0" [label="a\n1.0.0", color=black];
    "b@1.2.0" [label="b\n1.2.0", color=black];
    "c@0.3.0" [label="c\n0.3.0", color=gray];
    "d@2.0" [label="d\n2.0", color=blue];

    "a@1.0.0" -> "b@1.2.0" [style=solid];
    "a@1.0.0" -> "c@0.3.0" [style=dashed];
    "a@1.0.0" -> "d@2.0" [style=solid];
}
"#;
        assert_eq!(dot, expected);
    }

    #[test]
    fn shared_nodes_are_emitted_once() {
        let d = || node("d", "1.0.0", DependencyType::Required, vec![]);
        let root = node(
            "a",
            "1.0.0",
            DependencyType::Required,
            vec![
                node("b", "1.0.0", DependencyType::Required, vec![d()]),
                node("c", "1.0.0", DependencyType::Required, vec![d()]),
            ],
        );
        let dot = DependencyGraph::new(root).to_dot();
        assert_eq!(dot.matches("\"d@1.0.0\" [label").count(), 1);
        assert!(dot.contains("\"b@1.0.0\" -> \"d@1.0.0\""));
        assert!(dot.contains("\"c@1.0.0\" -> \"d@1.0.0\""));
    }

    #[test]
    fn problems_are_highlighted() {
        let root = node(
            "a",
            "1.0.0",
            DependencyType::Required,
            vec![
                node("lib", "1.0.0", DependencyType::Required, vec![]),
                node("b", "1.0.0", DependencyType::Required, vec![]),
            ],
        );
        let mut graph = DependencyGraph::new(root);
        graph.conflicts.push(VersionConflict {
            mod_id: "lib".to_string(),
            required_by: vec!["a".to_string(), "b".to_string()],
            constraints: vec!["=1.0.0".to_string(), "=2.0.0".to_string()],
        });
        graph.incompatibles.push(IncompatiblePair {
            mod_a: "b".to_string(),
            mod_b: "lib".to_string(),
            reason: "b declares lib incompatible".to_string(),
        });
        let dot = graph.to_dot();
        assert!(dot.contains(
            "\"lib@1.0.0\" [label=\"lib\\n1.0.0\", color=black, style=filled, fillcolor=\"#f4cccc\"];"
        ));
        assert!(dot.contains(
            "\"b@1.0.0\" -> \"lib@1.0.0\" [color=red, style=dashed, label=\"incompatible\"];"
        ));
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        let root = node(
            "pack",
            "1.0.0",
            DependencyType::Required,
            vec![node("shader\\pack", "\"beta\"", DependencyType::Embedded, vec![])],
        );
        let dot = DependencyGraph::new(root).to_dot();
        assert!(dot.contains(
            r#""shader\\pack@\"beta\"" [label="shader\\pack\n\"beta\"", color=blue];"#
        ));
    }

    #[test]
    fn output_is_deterministic() {
        let build = || {
            let kids = (0..20)
                .map(|i| node(&format!("m{i}"), "1.0.0", DependencyType::Required, vec![]))
                .collect();
            DependencyGraph::new(node("root", "1.0.0", DependencyType::Required, kids))
        };
        assert_eq!(build().to_dot(), build().to_dot());
    }
}
