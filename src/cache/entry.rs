//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use bytes::Bytes;

// == Cache Entry ==
/// A value held in the local cache together with its expiry deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value, opaque bytes as read from or written to the backing store
    pub value: Bytes,
    /// Instant the entry was created or last overwritten
    pub created_at: Instant,
    /// Instant after which the entry must not be served.
    /// None when `created_at + ttl` is not representable; such an entry never expires.
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry as if it had been written at `now`.
    pub fn created_at(value: Bytes, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            expires_at: now.checked_add(ttl),
        }
    }

    // == Is Expired ==
    /// Checks expiry against an explicit instant.
    ///
    /// An entry is expired once `now` reaches `expires_at`, so an entry is
    /// never served at or after its deadline.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
