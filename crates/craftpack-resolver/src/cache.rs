//! Memoization of resolved subtrees, keyed by `id@version`.
//!
//! One cache is owned by each [`crate::resolver::Resolver`] and may be shared
//! by concurrent `resolve` calls, so every access goes through a `RwLock`.
//! Entries are independent; no ordering across keys is promised.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::graph::ResolvedDependency;

/// Thread-safe store of previously resolved nodes.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<String, ResolvedDependency>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clone of the cached node for `key`, if any.
    pub fn get(&self, key: &str) -> Option<ResolvedDependency> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Store a resolved node. An existing entry for the same key is replaced.
    pub fn insert(&self, key: String, node: ResolvedDependency) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, node);
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
