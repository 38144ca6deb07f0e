//! Cache Module
//!
//! Provides the bounded local cache with TTL expiration and LRU eviction, and
//! the read-through / write-through protocol that puts it in front of a
//! backing store.

mod bounded;
mod entry;
mod local;
mod lru;
mod stats;


// Re-export public types
pub use bounded::{BoundedCache, Lookup, Source};
pub use entry::CacheEntry;
pub use local::{LocalCache, Residency};
pub use lru::{NodeId, RecencyList};
pub use stats::{CacheInfo, CacheStats};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
