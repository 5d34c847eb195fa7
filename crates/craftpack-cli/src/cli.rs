//! CLI argument definitions for craftpack.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use craftpack_core::config::Strategy;
use craftpack_core::dependency::LoaderType;

#[derive(Parser, Debug)]
#[command(
    name = "craftpack",
    version,
    about = "Dependency resolution for Minecraft modpacks",
    long_about = "craftpack validates a modpack's declared mods, resolves their dependency \
                  trees against a mod index, and reports version conflicts, incompatible \
                  mods and mod-loader mismatches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the dependencies declared in Craftpack.toml
    Check {
        /// Manifest to check (defaults to ./Craftpack.toml)
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Mod index used to confirm required mods exist
        #[arg(long)]
        index: Option<PathBuf>,
    },

    /// Resolve a mod, or every required mod of the pack
    Resolve {
        /// Mod id (resolves the whole pack when omitted)
        #[arg(value_name = "MOD")]
        root: Option<String>,
        /// Exact version of the mod (newest when omitted)
        version: Option<String>,
        /// Mod index file
        #[arg(long)]
        index: Option<PathBuf>,
        /// Version selection strategy: latest or minimal
        #[arg(long)]
        strategy: Option<Strategy>,
        /// Skip optional dependencies
        #[arg(long)]
        no_optional: bool,
        /// Stop descending below this depth (0 for unlimited)
        #[arg(long)]
        max_depth: Option<usize>,
        /// Target mod loader
        #[arg(long)]
        loader: Option<LoaderType>,
        /// Target mod loader version
        #[arg(long)]
        loader_version: Option<String>,
        /// Target Minecraft version
        #[arg(long)]
        minecraft: Option<String>,
        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display the dependency tree of a mod
    Tree {
        /// Mod id
        #[arg(value_name = "MOD")]
        root: String,
        /// Exact version of the mod (newest when omitted)
        version: Option<String>,
        /// Mod index file
        #[arg(long)]
        index: Option<PathBuf>,
        /// Maximum depth
        #[arg(long)]
        depth: Option<usize>,
        /// Explain why a mod is included
        #[arg(long)]
        why: Option<String>,
        /// Print Graphviz DOT instead of a tree
        #[arg(long)]
        dot: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn resolve_flags() {
        let cli = Cli::try_parse_from([
            "craftpack",
            "resolve",
            "sodium",
            "0.5.3",
            "--strategy",
            "minimal",
            "--loader",
            "neoforge",
            "--no-optional",
        ])
        .unwrap();
        match cli.command {
            Command::Resolve {
                root,
                version,
                strategy,
                loader,
                no_optional,
                ..
            } => {
                assert_eq!(root.as_deref(), Some("sodium"));
                assert_eq!(version.as_deref(), Some("0.5.3"));
                assert_eq!(strategy, Some(Strategy::Minimal));
                assert_eq!(loader, Some(LoaderType::NeoForge));
                assert!(no_optional);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!(Cli::try_parse_from(["craftpack", "resolve", "--strategy", "oldest"]).is_err());
    }
}
