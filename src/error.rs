//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Errors surfaced by the cache to the HTTP layer.
///
/// A key missing from both tiers is not an error; see
/// [`Lookup`](crate::cache::Lookup).
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store could not be reached or timed out
    #[error("Backing store unavailable for key '{key}': {source}")]
    BackingStoreUnavailable {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Invalid request data, rejected before reaching the cache
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// HTTP status the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::BackingStoreUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.to_string(), status));

        (status, body).into_response()
    }
}

// == Store Error Enum ==
/// Failures talking to the backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No pooled connection could be obtained
    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// The command failed on the wire or on the server
    #[error("redis error: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),

    /// The call did not complete within the call-level timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The store refused the call because it is offline
    #[error("backing store is offline")]
    Offline,

    /// The client could not be built
    #[error("invalid backing store setup: {0}")]
    Setup(String),
}

// == Config Error Enum ==
/// Rejected configuration values.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("CACHE_CAPACITY must be at least 1")]
    ZeroCapacity,

    #[error("CACHE_EXPIRY must be a positive number of seconds, got {0}")]
    InvalidExpiry(f64),

    #[error("MAX_CONCURRENT_REQUESTS must be at least 1")]
    ZeroConcurrency,

    #[error("BACKING_TIMEOUT_MS must be at least 1")]
    ZeroTimeout,

    #[error("REDIS_POOL_SIZE must be at least 1")]
    ZeroPoolSize,
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let unavailable = CacheError::BackingStoreUnavailable {
            key: "k".to_string(),
            source: StoreError::Offline,
        };
        assert_eq!(unavailable.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            CacheError::InvalidRequest("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_unavailable_message_names_key_and_reason() {
        let err = CacheError::BackingStoreUnavailable {
            key: "user:1".to_string(),
            source: StoreError::Timeout(Duration::from_millis(250)),
        };
        let message = err.to_string();
        assert!(message.contains("user:1"));
        assert!(message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let response = CacheError::InvalidRequest("dict values are not allowed".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status_code"], 400);
        assert!(json["error"].as_str().unwrap().contains("dict values"));
    }
}
