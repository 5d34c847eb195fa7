//! The resolver's output: the resolved tree, its flattened mod list, and the
//! problem reports collected along the way.

use std::collections::HashSet;
use std::fmt;

use craftpack_core::dependency::DependencyType;
use craftpack_core::mod_info::ModInfo;
use serde::Serialize;

use crate::conflict::{IncompatiblePair, LoaderConflict, VersionConflict};

/// A node of the resolved tree. Children are owned, never shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub id: String,
    pub version: String,
    pub download_url: String,
    #[serde(rename = "type")]
    pub kind: DependencyType,
    pub dependencies: Vec<ResolvedDependency>,
    pub is_optional: bool,
}

impl ResolvedDependency {
    /// A childless node for a fetched mod.
    pub fn from_mod(info: &ModInfo, kind: DependencyType) -> Self {
        Self {
            id: info.id.clone(),
            version: info.version.clone(),
            download_url: info.download_url.clone(),
            kind,
            dependencies: Vec::new(),
            is_optional: kind == DependencyType::Optional,
        }
    }

    /// A bundled dependency; its version is the declared constraint text.
    pub fn embedded(id: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            version: version.to_string(),
            download_url: String::new(),
            kind: DependencyType::Embedded,
            dependencies: Vec::new(),
            is_optional: false,
        }
    }

    /// `id@version`.
    pub fn key(&self) -> String {
        format!("{}@{}", self.id, self.version)
    }

    /// Depth-first pre-order walk over this node and its descendants.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Copy of this node with its children dropped.
    fn shallow(&self) -> Self {
        Self {
            dependencies: Vec::new(),
            ..self.clone()
        }
    }
}

impl fmt::Display for ResolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}

/// Iterator returned by [`ResolvedDependency::pre_order`].
pub struct PreOrder<'a> {
    stack: Vec<&'a ResolvedDependency>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a ResolvedDependency;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.dependencies.iter().rev());
        Some(node)
    }
}

/// Flatten a resolved tree into a list deduplicated by `id@version`.
///
/// The walk is depth-first pre-order; the first occurrence of a key wins.
/// Entries are shallow copies without children.
pub fn flatten(root: &ResolvedDependency) -> Vec<ResolvedDependency> {
    let mut seen = HashSet::new();
    root.pre_order()
        .filter(|node| seen.insert(node.key()))
        .map(ResolvedDependency::shallow)
        .collect()
}

/// Complete result of one successful resolve.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyGraph {
    pub root: ResolvedDependency,
    pub all_mods: Vec<ResolvedDependency>,
    pub conflicts: Vec<VersionConflict>,
    pub incompatibles: Vec<IncompatiblePair>,
    pub loader_conflicts: Vec<LoaderConflict>,
}

impl DependencyGraph {
    /// A graph with no problems, with `all_mods` derived from `root`.
    pub fn new(root: ResolvedDependency) -> Self {
        let all_mods = flatten(&root);
        Self {
            root,
            all_mods,
            conflicts: Vec::new(),
            incompatibles: Vec::new(),
            loader_conflicts: Vec::new(),
        }
    }

    /// `true` if any problem report is present.
    pub fn has_errors(&self) -> bool {
        !self.conflicts.is_empty()
            || !self.incompatibles.is_empty()
            || !self.loader_conflicts.is_empty()
    }

    /// One line per problem: version conflicts, then incompatibilities, then
    /// loader conflicts.
    pub fn errors(&self) -> Vec<String> {
        self.conflicts
            .iter()
            .map(ToString::to_string)
            .chain(self.incompatibles.iter().map(ToString::to_string))
            .chain(self.loader_conflicts.iter().map(ToString::to_string))
            .collect()
    }

    /// First flattened entry with the given mod id.
    pub fn find(&self, id: &str) -> Option<&ResolvedDependency> {
        self.all_mods.iter().find(|m| m.id == id)
    }

    /// Number of unique mods, root included.
    pub fn len(&self) -> usize {
        self.all_mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_mods.is_empty()
    }

    /// Serialize the whole graph as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Print the resolved tree with box-drawing connectors.
    ///
    /// `max_depth` limits how many levels below the root are shown.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = format!("{}\n", self.root);
        let count = self.root.dependencies.len();
        for (i, child) in self.root.dependencies.iter().enumerate() {
            print_subtree(&mut output, child, "", i == count - 1, 1, max_depth);
        }
        output
    }

    /// Chain of nodes from the root to the first node (pre-order) with `id`.
    pub fn find_path(&self, id: &str) -> Option<Vec<&ResolvedDependency>> {
        let mut path = Vec::new();
        if dfs_path(&self.root, id, &mut path) {
            Some(path)
        } else {
            None
        }
    }
}

fn print_subtree(
    output: &mut String,
    node: &ResolvedDependency,
    prefix: &str,
    is_last: bool,
    depth: usize,
    max_depth: Option<usize>,
) {
    let connector = if is_last { "└── " } else { "├── " };
    let marker = match node.kind {
        DependencyType::Optional => " (optional)",
        DependencyType::Embedded => " (embedded)",
        _ => "",
    };
    output.push_str(&format!("{prefix}{connector}{node}{marker}\n"));

    if max_depth.is_some_and(|max| depth >= max) {
        return;
    }

    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    let count = node.dependencies.len();
    for (i, child) in node.dependencies.iter().enumerate() {
        print_subtree(output, child, &child_prefix, i == count - 1, depth + 1, max_depth);
    }
}

fn dfs_path<'a>(
    node: &'a ResolvedDependency,
    id: &str,
    path: &mut Vec<&'a ResolvedDependency>,
) -> bool {
    path.push(node);
    if node.id == id {
        return true;
    }
    for child in &node.dependencies {
        if dfs_path(child, id, path) {
            return true;
        }
    }
    path.pop();
    false
}
