//! Shared utilities for craftpack.
//!
//! Cross-cutting concerns used by every other craftpack crate: the unified
//! error type and terminal status output.

pub mod errors;
pub mod progress;
