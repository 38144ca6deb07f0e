//! API Module
//!
//! HTTP handlers and routing for the caching proxy.
//!
//! # Endpoints
//! - `GET /:key` - Read a key through the local cache
//! - `PUT /:key` - Write a key through to the backing store
//! - `GET /cache` - Inspect the local cache
//! - `DELETE /cache` - Flush the local cache
//! - `GET /ping` - Liveness check

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
