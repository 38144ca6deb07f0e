//! Cache Proxy - A write-through caching proxy in front of Redis
//!
//! Serves repeated reads from a bounded local cache with TTL expiration and
//! LRU eviction, and commits every write to the backing store before caching it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use cache::BoundedCache;
pub use config::Config;
