//! In-process backing store.
//!
//! Behaves like a durable store for the lifetime of the value. Can be switched
//! offline to reproduce connectivity failures, paused to reproduce a slow
//! store, and counts calls so callers can check whether a request reached the
//! store at all.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::store::BackingStore;

#[derive(Debug)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, Bytes>>,
    offline: AtomicBool,
    paused: watch::Sender<bool>,
    gets: AtomicU64,
    sets: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            data: Mutex::default(),
            offline: AtomicBool::new(false),
            paused: watch::Sender::new(false),
            gets: AtomicU64::new(0),
            sets: AtomicU64::new(0),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Bytes>,
    {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            data: Mutex::new(data),
            ..Self::default()
        }
    }

    /// While offline every call fails with [`StoreError::Offline`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Holds every `get` and `set` after it has been counted, until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.paused.send_replace(true);
    }

    pub fn resume(&self) {
        self.paused.send_replace(false);
    }

    /// Reads a value directly, bypassing call counting and the offline switch.
    pub fn peek(&self, key: &str) -> Option<Bytes> {
        self.data.lock().get(key).cloned()
    }

    /// Number of `get` calls received, including failed ones.
    pub fn get_calls(&self) -> u64 {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `set` calls received, including failed ones.
    pub fn set_calls(&self) -> u64 {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    async fn wait_until_resumed(&self) {
        let mut paused = self.paused.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = paused.wait_for(|paused| !*paused).await;
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Offline)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn ping(&self) -> bool {
        self.check_online().is_ok()
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.wait_until_resumed().await;
        self.check_online()?;
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.wait_until_resumed().await;
        self.check_online()?;
        self.data
            .lock()
            .insert(key.to_string(), Bytes::copy_from_slice(value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::new();

        store.set("k", b"v").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(Bytes::from_static(b"v")));
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert_eq!(store.get_calls(), 2);
        assert_eq!(store.set_calls(), 1);
    }

    #[tokio::test]
    async fn test_with_entries() {
        let store = MemoryStore::with_entries([("1", "one"), ("2", "two")]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.peek("2"), Some(Bytes::from("two")));
        assert_eq!(store.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryStore::with_entries([("k", "v")]);
        store.set_offline(true);

        assert!(!store.ping().await);
        assert!(matches!(store.get("k").await, Err(StoreError::Offline)));
        assert!(matches!(store.set("k", b"new").await, Err(StoreError::Offline)));

        // Failed writes leave the data untouched
        assert_eq!(store.peek("k"), Some(Bytes::from("v")));

        store.set_offline(false);
        assert!(store.ping().await);
    }

    #[tokio::test]
    async fn test_paused_store_holds_calls() {
        let store = std::sync::Arc::new(MemoryStore::with_entries([("k", "v")]));
        store.pause();

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.get("k").await }
        });
        let held = tokio::time::timeout(std::time::Duration::from_millis(50), async {
            while store.get_calls() == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(held.is_ok());
        assert!(!pending.is_finished());

        store.resume();
        assert_eq!(pending.await.unwrap().unwrap(), Some(Bytes::from("v")));
    }
}
