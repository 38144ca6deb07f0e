//! Bounded Cache Module
//!
//! Read-through / write-through coordination between the [`LocalCache`] and a
//! [`BackingStore`].
//!
//! The local structure sits behind a single mutex. The lock is only taken
//! around in-memory operations and is always released before the backing
//! store is called, so a slow store never stalls lookups of other keys.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheInfo, LocalCache, Residency};
use crate::config::Config;
use crate::error::{CacheError, Result, StoreError};
use crate::store::BackingStore;

// == Source ==
/// Where a lookup was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Local,
    Backing,
}

// == Lookup ==
/// Result of [`BoundedCache::get`].
///
/// `value` is `None` when the key exists in neither the local cache nor the
/// backing store; that is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub value: Option<Bytes>,
    pub source: Source,
}

impl Lookup {
    fn local(value: Bytes) -> Self {
        Self {
            value: Some(value),
            source: Source::Local,
        }
    }

    fn backing(value: Option<Bytes>) -> Self {
        Self {
            value,
            source: Source::Backing,
        }
    }

    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }
}

// == Bounded Cache ==
/// Capacity-bounded, TTL-limited LRU cache in front of a durable store.
///
/// Constructed once at startup and shared by every request handler through an
/// `Arc`.
pub struct BoundedCache {
    local: Mutex<LocalCache>,
    store: Arc<dyn BackingStore>,
}

impl BoundedCache {
    // == Constructor ==
    pub fn new(store: Arc<dyn BackingStore>, capacity: usize, ttl: Duration) -> Self {
        Self {
            local: Mutex::new(LocalCache::new(capacity, ttl)),
            store,
        }
    }

    /// Creates a cache sized by `config`.
    pub fn from_config(config: &Config, store: Arc<dyn BackingStore>) -> Self {
        Self::new(store, config.capacity, config.ttl())
    }

    // == Get ==
    /// Reads `key`, serving it locally when fresh and from the backing store otherwise.
    ///
    /// A value fetched from the backing store is cached with a fresh TTL. A key
    /// the backing store does not have is not cached. On store failure the
    /// local cache is left untouched.
    pub async fn get(&self, key: &str) -> Result<Lookup> {
        let residency = self.local.lock().lookup(key);

        match residency {
            Residency::Hit(value) => {
                debug!(key = %key, "Served from local cache");
                return Ok(Lookup::local(value));
            }
            Residency::Expired => info!(key = %key, "Local entry expired"),
            Residency::Missing => debug!(key = %key, "Local cache miss"),
        }

        let fetched = self
            .store
            .get(key)
            .await
            .map_err(|e| unavailable("GET", key, e))?;

        match fetched {
            Some(value) => {
                self.fill(key, value.clone());
                info!(key = %key, "Fetched value from backing store");
                Ok(Lookup::backing(Some(value)))
            }
            None => {
                info!(key = %key, "Key absent from backing store");
                Ok(Lookup::backing(None))
            }
        }
    }

    // == Put ==
    /// Writes `value` to the backing store, then caches it locally.
    ///
    /// The local cache is only updated once the backing store has
    /// acknowledged the write.
    pub async fn put(&self, key: &str, value: Bytes) -> Result<()> {
        self.store
            .set(key, &value)
            .await
            .map_err(|e| unavailable("SET", key, e))?;

        self.fill(key, value);
        info!(key = %key, "Stored value");
        Ok(())
    }

    fn fill(&self, key: &str, value: Bytes) {
        let evicted = self.local.lock().insert(key, value);
        if let Some(evicted) = evicted {
            info!(key = %evicted, "Evicted least recently used entry");
        }
    }

    // == Info ==
    /// Returns a consistent snapshot of resident keys, occupancy and capacity.
    pub fn info(&self) -> CacheInfo {
        self.local.lock().info()
    }

    // == Flush ==
    /// Clears every local entry. The backing store is not touched.
    pub fn flush(&self) -> usize {
        let cleared = self.local.lock().flush();
        info!(cleared, "Flushed local cache");
        cleared
    }

    // == Ping ==
    /// Checks the backing store, logging the outcome.
    pub async fn ping_store(&self) -> bool {
        let alive = self.store.ping().await;
        if alive {
            info!("Established connection to backing store");
        } else {
            warn!("Backing store did not answer ping");
        }
        alive
    }

    pub fn len(&self) -> usize {
        self.local.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.local.lock().is_empty()
    }
}

fn unavailable(op: &str, key: &str, source: StoreError) -> CacheError {
    error!(key = %key, reason = %source, "{} failed on backing store", op);
    CacheError::BackingStoreUnavailable {
        key: key.to_string(),
        source,
    }
}
