//! Operation: display the dependency tree.

use std::path::{Path, PathBuf};

use craftpack_resolver::{DependencyGraph, Resolver};
use craftpack_util::progress;

use crate::Context;

/// Options for `craftpack tree`.
#[derive(Debug, Default)]
pub struct TreeOptions {
    pub root: String,
    pub version: Option<String>,
    pub index: Option<PathBuf>,
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show the path from the root to a specific mod.
    pub why: Option<String>,
    /// Emit Graphviz DOT instead of a text tree.
    pub dot: bool,
}

/// Resolve `opts.root` and print its tree.
pub fn tree(project_dir: &Path, opts: &TreeOptions) -> miette::Result<()> {
    let ctx = Context::load(project_dir, opts.index.as_deref())?;
    let options = ctx.resolution_options();
    let resolver = Resolver::new(ctx.provider, options);
    let graph = resolver.resolve(&opts.root, opts.version.as_deref().unwrap_or("*"))?;
    print!("{}", render(&graph, opts));

    for problem in graph.errors() {
        progress::status_warn("Warning", &problem);
    }
    Ok(())
}

fn render(graph: &DependencyGraph, opts: &TreeOptions) -> String {
    if let Some(target) = &opts.why {
        return match graph.find_path(target) {
            Some(path) => {
                let mut out = format!("Path to {target}:\n");
                for (i, node) in path.iter().enumerate() {
                    out.push_str(&format!("{}{node}\n", "  ".repeat(i)));
                }
                out
            }
            None => format!("Mod '{target}' not found in the graph.\n"),
        };
    }
    if opts.dot {
        return graph.to_dot();
    }
    graph.print_tree(opts.depth)
}
