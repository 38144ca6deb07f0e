//! Response DTOs for the proxy API
//!
//! Every body carries a `status_code` mirroring the HTTP status.

use axum::http::StatusCode;
use bytes::Bytes;
use serde::Serialize;

use crate::cache::{CacheInfo, CacheStats, Lookup, Source};

fn render(value: &Bytes) -> String {
    String::from_utf8_lossy(value).into_owned()
}

/// Response body for `GET /{key}`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The value, `null` when the key exists nowhere
    pub value: Option<String>,
    /// Which tier answered
    pub source: Source,
    pub status_code: u16,
}

impl GetResponse {
    /// Builds the body and its HTTP status: 200 when found, 404 otherwise.
    pub fn from_lookup(lookup: Lookup) -> (StatusCode, Self) {
        let status = if lookup.is_found() {
            StatusCode::OK
        } else {
            StatusCode::NOT_FOUND
        };
        let body = Self {
            value: lookup.value.as_ref().map(render),
            source: lookup.source,
            status_code: status.as_u16(),
        };
        (status, body)
    }
}

/// Response body for `PUT /{key}`
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    pub key: String,
    pub value: String,
    pub status_code: u16,
}

impl PutResponse {
    pub fn new(key: impl Into<String>, value: &Bytes) -> Self {
        Self {
            key: key.into(),
            value: render(value),
            status_code: StatusCode::OK.as_u16(),
        }
    }
}

/// Response body for `GET /cache`
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfoResponse {
    /// Resident keys, least recently used first
    pub keys: Vec<String>,
    pub occupancy: usize,
    pub capacity: usize,
    pub stats: CacheStats,
    /// Local hits over all lookups
    pub hit_rate: f64,
    pub status_code: u16,
}

impl From<CacheInfo> for CacheInfoResponse {
    fn from(info: CacheInfo) -> Self {
        Self {
            keys: info.keys,
            occupancy: info.occupancy,
            capacity: info.capacity,
            hit_rate: info.stats.hit_rate(),
            stats: info.stats,
            status_code: StatusCode::OK.as_u16(),
        }
    }
}

/// Response body for `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub cache_cleared: bool,
    pub status_code: u16,
}

impl FlushResponse {
    pub fn cleared() -> Self {
        Self {
            cache_cleared: true,
            status_code: StatusCode::OK.as_u16(),
        }
    }
}

/// Response body for `GET /ping`
#[derive(Debug, Clone, Serialize)]
pub struct PingResponse {
    pub ping: String,
    pub status_code: u16,
}

impl PingResponse {
    pub fn ok() -> Self {
        Self {
            ping: "OK".to_string(),
            status_code: StatusCode::OK.as_u16(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, status: StatusCode) -> Self {
        Self {
            error: error.into(),
            status_code: status.as_u16(),
        }
    }
}
