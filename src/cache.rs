//! Fingerprint Cache
//!
//! Session-owned key/value store. A lookup returns the stored value only when
//! the caller's dependency fingerprint equals the one recorded with it;
//! otherwise the value is recomputed and the entry overwritten. Entries are
//! never evicted, so one cache should live exactly as long as one session.
//!
//! Single-threaded by construction: it is owned by a session and borrowed
//! mutably, never shared.

use std::collections::HashMap;
use tracing::trace;

/// Stored value together with the fingerprint it was computed under.
#[derive(Debug, Clone)]
pub struct CacheEntry<V, D> {
    pub key: String,
    pub value: V,
    pub dependency: D,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
pub struct FingerprintCache<V, D = String> {
    entries: HashMap<String, CacheEntry<V, D>>,
    stats: CacheStats,
}

/// Cache of markdown content keyed by file, fingerprinted by modified time.
pub type ContentCache = FingerprintCache<String, String>;

impl<V, D> Default for FingerprintCache<V, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, D> FingerprintCache<V, D> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entry(&self, key: &str) -> Option<&CacheEntry<V, D>> {
        self.entries.get(key)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<V: Clone, D: PartialEq> FingerprintCache<V, D> {
    /// Return the cached value for `key` if it was computed under `dependency`,
    /// otherwise run `compute` and store its result.
    pub fn get_or_compute<F>(&mut self, key: &str, dependency: D, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        match self.try_get_or_compute::<_, std::convert::Infallible>(key, dependency, || {
            Ok(compute())
        }) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get_or_compute`](Self::get_or_compute).
    ///
    /// A failed computation leaves any previous entry for `key` untouched.
    pub fn try_get_or_compute<F, E>(&mut self, key: &str, dependency: D, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(entry) = self.entries.get(key) {
            if entry.dependency == dependency {
                self.stats.hits += 1;
                trace!(key, "Cache hit");
                return Ok(entry.value.clone());
            }
        }

        self.stats.misses += 1;
        trace!(key, "Cache miss");
        let value = compute()?;
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                key: key.to_string(),
                value: value.clone(),
                dependency,
            },
        );
        Ok(value)
    }
}
