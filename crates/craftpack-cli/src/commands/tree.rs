//! Handler for `craftpack tree`.

use std::path::PathBuf;

use miette::Result;

use craftpack_ops::ops_tree::{self, TreeOptions};
use craftpack_util::errors::CraftpackError;

pub fn exec(
    root: String,
    version: Option<String>,
    index: Option<PathBuf>,
    depth: Option<usize>,
    why: Option<String>,
    dot: bool,
) -> Result<()> {
    let project_root = std::env::current_dir().map_err(CraftpackError::Io)?;

    let opts = TreeOptions {
        root,
        version,
        index,
        depth,
        why,
        dot,
    };

    ops_tree::tree(&project_root, &opts)
}
