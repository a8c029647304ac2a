//! Error types for the product cache service
//!
//! Three layers, using thiserror:
//! - `CacheError`: cache transport and codec failures, always absorbed by the cache layer
//! - `StoreError`: failures of the authoritative product store, propagated unchanged
//! - `ApiError`: what HTTP handlers return to clients

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Failures inside the cache layer.
///
/// None of these ever reach an end user: reads degrade to a miss,
/// writes and deletes degrade to a no-op.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Transport or connection failure talking to the cache backend
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Backend call exceeded the configured operation timeout
    #[error("Cache operation timed out after {0}ms")]
    Timeout(u64),

    /// Cached payload could not be deserialized
    #[error("Cached payload could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    /// Query result could not be serialized for caching
    #[error("Query result could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    /// Key rejected by the backend (too long, empty)
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// Payload larger than the backend accepts
    #[error("Payload of {0} bytes exceeds the backend limit")]
    PayloadTooLarge(usize),
}

impl CacheError {
    /// The backend refused this particular request; the backend itself is healthy.
    pub fn is_rejection(&self) -> bool {
        matches!(self, CacheError::InvalidKey(_) | CacheError::PayloadTooLarge(_))
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

// == Store Error Enum ==
/// Failures of the authoritative product store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No document with the given identifier
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Document failed validation
    #[error("Invalid product: {0}")]
    Invalid(String),

    /// Store could not execute the query
    #[error("Store failure: {0}")]
    Backend(String),
}

// == API Error Enum ==
/// Error returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Request failed validation
    #[error("{0}")]
    InvalidRequest(String),

    /// Unexpected failure
    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound("Product not found".to_string()),
            StoreError::Invalid(msg) => ApiError::InvalidRequest(msg),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Result type for cache backends.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_404() {
        let response = ApiError::from(StoreError::NotFound("abc".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_invalid_maps_to_400() {
        let response = ApiError::from(StoreError::Invalid("bad price".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_backend_maps_to_500() {
        let response = ApiError::from(StoreError::Backend("down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
