//! Redis-backed store over a `deadpool-redis` connection pool.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use deadpool_redis::redis::{self, AsyncCommands};
use deadpool_redis::{Pool, PoolConfig, Runtime};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::StoreError;
use crate::store::BackingStore;

/// Pooled Redis client. Every command is bounded by a call-level timeout.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
    timeout: Duration,
}

impl RedisStore {
    /// Builds the pool. No connection is opened until the first command.
    pub fn new(url: &str, pool_size: usize, timeout: Duration) -> Result<Self, StoreError> {
        let mut redis_config = deadpool_redis::Config::from_url(url);
        let mut pool_config = PoolConfig::new(pool_size);
        pool_config.timeouts.wait = Some(timeout);
        pool_config.timeouts.create = Some(timeout);
        pool_config.timeouts.recycle = Some(timeout);
        redis_config.pool = Some(pool_config);

        let pool = redis_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StoreError::Setup(e.to_string()))?;

        debug!(url = %url, pool_size, ?timeout, "Redis pool created");
        Ok(Self { pool, timeout })
    }

    /// Builds the pool from the process configuration.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        Self::new(
            &config.redis_url(),
            config.redis_pool_size,
            config.backing_timeout(),
        )
    }

    async fn with_timeout<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl BackingStore for RedisStore {
    async fn ping(&self) -> bool {
        let result = self
            .with_timeout(async {
                let mut conn = self.pool.get().await?;
                let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
                Ok(pong)
            })
            .await;

        match result {
            Ok(pong) => pong == "PONG",
            Err(e) => {
                warn!(error = %e, "Redis ping failed");
                false
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.with_timeout(async {
            let mut conn = self.pool.get().await?;
            let value: Option<Vec<u8>> = conn.get(key).await?;
            Ok(value.map(Bytes::from))
        })
        .await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.with_timeout(async {
            let mut conn = self.pool.get().await?;
            conn.set::<_, _, ()>(key, value).await?;
            Ok(())
        })
        .await
    }
}
