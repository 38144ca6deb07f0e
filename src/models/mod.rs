//! Request and Response models for the proxy API
//!
//! This module defines request validation and the DTOs serialized into HTTP
//! response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::PutRequest;
pub use responses::{
    CacheInfoResponse, ErrorResponse, FlushResponse, GetResponse, PingResponse, PutResponse,
};
