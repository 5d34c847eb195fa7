//! Core data types for craftpack.
//!
//! Mod metadata as supplied by a metadata provider, typed and
//! version-constrained dependencies, mod-loader requirements, the pack
//! manifest (`Craftpack.toml`) and the global configuration.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod config;
pub mod dependency;
pub mod manifest;
pub mod mod_info;
