//! Dependency resolution engine for Minecraft modpacks: lenient version and
//! constraint model, the metadata provider contract, recursive resolution with
//! cycle detection and strategy-based version selection, dependency graph
//! export, and static validation of declared dependency lists.

pub mod cache;
pub mod conflict;
pub mod constraint;
pub mod dot;
pub mod error;
pub mod graph;
pub mod provider;
pub mod resolver;
pub mod validate;
pub mod version;

pub use error::{ProviderError, ResolutionError, ResolutionErrorKind};
pub use graph::{DependencyGraph, ResolvedDependency};
pub use provider::{IndexProvider, MetadataProvider};
pub use resolver::{ResolutionOptions, Resolver};
