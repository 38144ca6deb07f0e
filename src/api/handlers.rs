//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint. Handlers only translate
//! between HTTP and [`BoundedCache`]; all caching decisions live in the cache.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::cache::{BoundedCache, MAX_VALUE_SIZE};
use crate::error::{CacheError, Result};
use crate::models::{
    CacheInfoResponse, FlushResponse, GetResponse, PingResponse, PutRequest, PutResponse,
};

/// Application state shared across all handlers.
///
/// Holds the single cache instance built at startup.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<BoundedCache>,
}

impl AppState {
    pub fn new(cache: Arc<BoundedCache>) -> Self {
        Self { cache }
    }
}

/// Handler for GET /{key}
///
/// 200 with the value when found in either tier, 404 with a `null` value otherwise.
/// Any key the store may hold can be read; key limits only apply to writes.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<GetResponse>)> {
    info!(key = %key, "Received GET request");

    let lookup = state.cache.get(&key).await?;
    let (status, body) = GetResponse::from_lookup(lookup);

    Ok((status, Json(body)))
}

/// Handler for PUT /{key}
///
/// Stores the raw request body under `key`, writing through to the backing store.
/// Bodies over the router's size limit are answered with 400 like any other
/// invalid value.
pub async fn put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<PutResponse>> {
    let body = body.map_err(body_rejected)?;
    info!(key = %key, size = body.len(), "Received PUT request");
    let req = PutRequest::parse(key, body)?;

    state.cache.put(&req.key, req.value.clone()).await?;

    Ok(Json(PutResponse::new(req.key, &req.value)))
}

fn body_rejected(rejection: BytesRejection) -> CacheError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CacheError::InvalidRequest(format!(
            "Value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        ))
    } else {
        CacheError::InvalidRequest(rejection.body_text())
    }
}

/// Handler for GET /cache
pub async fn cache_info_handler(State(state): State<AppState>) -> Json<CacheInfoResponse> {
    Json(CacheInfoResponse::from(state.cache.info()))
}

/// Handler for DELETE /cache
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    state.cache.flush();
    Json(FlushResponse::cleared())
}

/// Handler for GET /ping
///
/// Liveness of the proxy itself; does not contact the backing store.
pub async fn ping_handler() -> Json<PingResponse> {
    Json(PingResponse::ok())
}
