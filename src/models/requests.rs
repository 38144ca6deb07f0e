//! Request validation for the proxy API
//!
//! `PUT /{key}` takes the value as the raw request body, so there is no JSON
//! request DTO; this module checks the key and body before they reach the cache.

use bytes::Bytes;

use crate::cache::{MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, Result};

/// A validated `PUT /{key}` request.
#[derive(Debug, Clone)]
pub struct PutRequest {
    pub key: String,
    pub value: Bytes,
}

impl PutRequest {
    /// Validates the key and raw body.
    ///
    /// Bodies that parse as a JSON object are rejected; any other body,
    /// including JSON scalars and arrays, is stored verbatim.
    pub fn parse(key: String, body: Bytes) -> Result<Self> {
        validate_key(&key)?;

        if body.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        if is_json_object(&body) {
            return Err(CacheError::InvalidRequest(
                "dict values are not allowed".to_string(),
            ));
        }

        Ok(Self { key, value: body })
    }
}

/// Rejects empty keys and keys longer than [`MAX_KEY_LENGTH`].
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

fn is_json_object(body: &[u8]) -> bool {
    matches!(
        serde_json::from_slice::<serde_json::Value>(body),
        Ok(serde_json::Value::Object(_))
    )
}
