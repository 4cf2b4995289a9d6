//! Memoization of resolved types.
//!
//! The [`CacheManager`] owns key generation so there is exactly one
//! canonicalization rule across the engine: canonical type text plus the
//! deterministic signature of the active [`GenericContext`]. Two
//! instantiations of one generic shape under different bindings therefore
//! never share an entry.
//!
//! An entry carries the generic parameters its frame registered alongside the
//! resolved type, so a hit can replay them into the caller's context and
//! leave it in the same state a fresh resolution would.
//!
//! Storage is injected through [`CacheStore`]. [`MemoryCacheStore`] is the
//! per-engine default; [`SharedCacheStore`] is a synchronized store that
//! several engines (one per concurrent caller) can share.

use crate::generics::GenericContext;
use crate::types::{GenericParam, TypeInfo};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub info: TypeInfo,
    /// Parameters first registered while resolving this frame.
    pub registered: Vec<GenericParam>,
    /// Types whose frames opened while resolving this one.
    pub opened: Vec<String>,
}

impl CacheEntry {
    pub fn new(info: TypeInfo) -> Self {
        Self {
            info,
            registered: Vec::new(),
            opened: Vec::new(),
        }
    }

    pub fn with_registered(mut self, registered: Vec<GenericParam>) -> Self {
        self.registered = registered;
        self
    }

    pub fn with_opened(mut self, opened: Vec<String>) -> Self {
        self.opened = opened;
        self
    }
}

pub trait CacheStore: Send {
    fn get(&self, key: &str) -> Option<CacheEntry>;
    fn set(&mut self, key: String, value: CacheEntry);
    fn clear(&mut self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: FxHashMap<String, CacheEntry>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: String, value: CacheEntry) {
        self.entries.insert(key, value);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Store shared between engine instances. Cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct SharedCacheStore {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl SharedCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for SharedCacheStore {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&mut self, key: String, value: CacheEntry) {
        self.entries.insert(key, value);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct CacheManager {
    store: Box<dyn CacheStore>,
    stats: CacheStats,
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(Box::new(MemoryCacheStore::new()))
    }
}

impl CacheManager {
    pub fn new(store: Box<dyn CacheStore>) -> Self {
        Self {
            store,
            stats: CacheStats::default(),
        }
    }

    /// Cache key for `type_text` under the bindings visible in `generics`.
    pub fn generate_key(&self, type_text: &str, generics: &GenericContext) -> String {
        let signature = generics.signature();
        if signature.is_empty() {
            type_text.to_string()
        } else {
            format!("{type_text}|{signature}")
        }
    }

    pub fn get(&mut self, key: &str) -> Option<CacheEntry> {
        self.get_usable(key, |_| true)
    }

    /// Like [`get`](Self::get), but an entry rejected by `usable` counts as
    /// a miss.
    pub fn get_usable(
        &mut self,
        key: &str,
        usable: impl FnOnce(&CacheEntry) -> bool,
    ) -> Option<CacheEntry> {
        let hit = self.store.get(key).filter(usable);
        if hit.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        hit
    }

    pub fn set(&mut self, key: String, value: CacheEntry) {
        self.store.set(key, value);
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;
