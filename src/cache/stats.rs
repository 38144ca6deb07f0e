//! Cache Statistics Module
//!
//! Tracks local cache counters and the occupancy snapshot served by `GET /cache`.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing how the local cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the local cache
    pub hits: u64,
    /// Lookups that had to fall through to the backing store
    pub misses: u64,
    /// Entries removed to keep the cache within capacity
    pub evictions: u64,
    /// Entries dropped because their TTL had elapsed when read
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// An expired entry is also a miss: the caller still goes to the backing store.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
        self.misses += 1;
    }
}

// == Cache Info ==
/// Consistent snapshot of the local cache.
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    /// Resident keys, least recently used first
    pub keys: Vec<String>,
    /// Number of resident entries
    pub occupancy: usize,
    /// Configured maximum number of entries
    pub capacity: usize,
    /// Usage counters at the time of the snapshot
    pub stats: CacheStats,
}
