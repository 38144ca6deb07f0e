//! Backing Store Module
//!
//! The durable key-value service the proxy sits in front of. It has no notion
//! of TTL, capacity or eviction; those belong to the local cache.

mod memory;
mod redis;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use redis::RedisStore;

// == Backing Store ==
/// Client contract for the authoritative key-value store.
///
/// Every call may fail with a connectivity or timeout error; callers treat
/// both the same way.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Liveness check. Failures are reported as `false`.
    async fn ping(&self) -> bool;

    /// Reads `key`, returning `None` when the store has no value for it.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Stores `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}
