//! Local Cache Module
//!
//! The in-memory half of the proxy: a HashMap index combined with a
//! [`RecencyList`] for LRU ordering and per-entry TTL expiry. It is not
//! synchronized; [`BoundedCache`](crate::cache::BoundedCache) owns it behind a
//! lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::cache::lru::{NodeId, RecencyList};
use crate::cache::{CacheEntry, CacheInfo, CacheStats};

// == Residency ==
/// Outcome of a local lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Residency {
    /// Fresh entry found; it is now the most recently used
    Hit(Bytes),
    /// Entry was present but past its deadline and has been removed
    Expired,
    /// Key is not resident
    Missing,
}

#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    node: NodeId,
}

// == Local Cache ==
/// Capacity-bounded, TTL-aware, recency-ordered key/value map.
#[derive(Debug)]
pub struct LocalCache {
    /// Key index into entries and recency nodes
    index: HashMap<String, Slot>,
    /// Recency order, least recently used first
    order: RecencyList<String>,
    /// Usage counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Lifetime given to every inserted entry
    ttl: Duration,
}

impl LocalCache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: HashMap::with_capacity(capacity),
            order: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            ttl,
        }
    }

    // == Lookup ==
    /// Looks up `key`, refreshing its recency on a hit and dropping it if expired.
    pub fn lookup(&mut self, key: &str) -> Residency {
        self.lookup_at(key, Instant::now())
    }

    /// Same as [`lookup`](Self::lookup) with an explicit clock reading.
    pub fn lookup_at(&mut self, key: &str, now: Instant) -> Residency {
        let Some(slot) = self.index.get(key) else {
            self.stats.record_miss();
            return Residency::Missing;
        };

        if slot.entry.is_expired_at(now) {
            self.remove(key);
            self.stats.record_expiration();
            return Residency::Expired;
        }

        let value = slot.entry.value.clone();
        self.order.move_to_back(slot.node);
        self.stats.record_hit();
        Residency::Hit(value)
    }

    // == Insert ==
    /// Inserts or overwrites `key` with a fresh TTL as the most recently used entry.
    ///
    /// Returns the key evicted to stay within capacity, if any.
    pub fn insert(&mut self, key: &str, value: Bytes) -> Option<String> {
        self.insert_at(key, value, Instant::now())
    }

    /// Same as [`insert`](Self::insert) with an explicit clock reading.
    pub fn insert_at(&mut self, key: &str, value: Bytes, now: Instant) -> Option<String> {
        let entry = CacheEntry::created_at(value, self.ttl, now);

        if let Some(slot) = self.index.get_mut(key) {
            slot.entry = entry;
            self.order.move_to_back(slot.node);
            return None;
        }

        let node = self.order.push_back(key.to_string());
        self.index.insert(key.to_string(), Slot { entry, node });

        if self.index.len() > self.capacity {
            return self.evict_oldest();
        }
        None
    }

    // == Evict Oldest ==
    fn evict_oldest(&mut self) -> Option<String> {
        let evicted = self.order.pop_front()?;
        self.index.remove(&evicted);
        self.stats.record_eviction();
        Some(evicted)
    }

    // == Remove ==
    /// Removes `key`, returning whether it was resident.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.index.remove(key) {
            Some(slot) => {
                self.order.remove(slot.node);
                true
            }
            None => false,
        }
    }

    // == Flush ==
    /// Drops every entry, returning how many were resident. Counters are kept.
    pub fn flush(&mut self) -> usize {
        let cleared = self.index.len();
        self.index.clear();
        self.order.clear();
        cleared
    }

    // == Info ==
    /// Returns a snapshot of resident keys, occupancy, capacity and counters.
    pub fn info(&self) -> CacheInfo {
        CacheInfo {
            keys: self.order.iter().cloned().collect(),
            occupancy: self.index.len(),
            capacity: self.capacity,
            stats: self.stats,
        }
    }

    /// Checks residency without touching recency or expiry.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
