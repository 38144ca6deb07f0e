//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_info_handler, flush_handler, get_handler, ping_handler, put_handler, AppState,
};
use crate::cache::MAX_VALUE_SIZE;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /ping` - Liveness check
/// - `GET /cache` - Local cache keys, occupancy and capacity
/// - `DELETE /cache` - Flush the local cache
/// - `GET /:key` - Read a key through the cache
/// - `PUT /:key` - Write a key through to the backing store
///
/// `cache` and `ping` are reserved: the static routes take precedence over
/// the key routes.
///
/// # Middleware
/// - Body limit: request bodies over `MAX_VALUE_SIZE` are refused with 400
/// - Concurrency limit: at most `max_concurrent_requests` requests in flight
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState, max_concurrent_requests: usize) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/cache", get(cache_info_handler).delete(flush_handler))
        .route("/:key", get(get_handler).put(put_handler))
        .layer(DefaultBodyLimit::max(MAX_VALUE_SIZE))
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent_requests))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BoundedCache;
    use crate::store::MemoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let store = Arc::new(MemoryStore::with_entries([("9", "v")]));
        let cache = BoundedCache::new(store, 3, Duration::from_secs(300));
        create_router(AppState::new(Arc::new(cache)), 8)
    }

    async fn send(app: Router, method: &str, uri: &str) -> StatusCode {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_ping_endpoint() {
        assert_eq!(send(create_test_app(), "GET", "/ping").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cache_endpoints() {
        let app = create_test_app();
        assert_eq!(send(app.clone(), "GET", "/cache").await, StatusCode::OK);
        assert_eq!(send(app, "DELETE", "/cache").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_key_routes() {
        let app = create_test_app();
        assert_eq!(send(app.clone(), "GET", "/9").await, StatusCode::OK);
        assert_eq!(send(app.clone(), "GET", "/missing").await, StatusCode::NOT_FOUND);
        assert_eq!(send(app, "PUT", "/new_key").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let app = create_test_app();
        assert_eq!(
            send(app, "DELETE", "/some_key").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
