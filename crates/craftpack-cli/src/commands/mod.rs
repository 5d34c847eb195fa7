//! Command dispatch and handler modules.

mod check;
mod resolve;
mod tree;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Check { manifest, index } => check::exec(manifest, index),
        Command::Resolve {
            root,
            version,
            index,
            strategy,
            no_optional,
            max_depth,
            loader,
            loader_version,
            minecraft,
            json,
        } => {
            let opts = craftpack_ops::ops_resolve::ResolveOptions {
                root,
                version,
                index,
                strategy,
                no_optional,
                max_depth,
                loader,
                loader_version,
                minecraft,
                json,
            };
            resolve::exec(&opts).await
        }
        Command::Tree {
            root,
            version,
            index,
            depth,
            why,
            dot,
        } => tree::exec(root, version, index, depth, why, dot),
    }
}
