//! Error types for the cache service
//!
//! Provides unified error handling using thiserror.
//!
//! The taxonomy keeps "key absent" (NotFound) separate from transport
//! trouble (Unavailable) and everything unexpected (Internal): NotFound is
//! the only routine negative outcome of a Get and must never be conflated
//! with a failure. Local store operations never produce an error at all;
//! absence is a `None`, not a fault.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for node and router surfaces.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in the shard's cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No reachable cache node for the shard, or log store unreachable
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Unexpected failure in the forwarding or replication path
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            CacheError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache service.
pub type Result<T> = std::result::Result<T, CacheError>;
