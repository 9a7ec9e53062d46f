//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::{Deserialize, Serialize};

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `namespace`: logical grouping the key belongs to
/// - `key`: the cache key within the namespace
/// - `value`: the opaque value to store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRequest {
    /// The namespace
    pub namespace: String,
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}
