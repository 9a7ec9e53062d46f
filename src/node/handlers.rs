//! Node API Handlers
//!
//! HTTP request handlers for the cache node endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{CacheError, Result};
use crate::models::{GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse};
use crate::node::NodeState;

/// Application state shared across all node handlers.
#[derive(Clone)]
pub struct NodeAppState {
    /// The node's core state; all handler work delegates here
    pub node: Arc<NodeState>,
}

impl NodeAppState {
    /// Creates handler state around existing node state.
    pub fn new(node: Arc<NodeState>) -> Self {
        Self { node }
    }
}

/// Handler for GET /get/:namespace/:key
///
/// A missing key surfaces as 404, never as an empty value.
pub async fn get_handler(
    State(state): State<NodeAppState>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let entry = state.node.get_value(&namespace, &key)?;
    Ok(Json(GetResponse::new(namespace, key, entry.value)))
}

/// Handler for PUT /set
///
/// Returns once the local write lands; replication happens asynchronously
/// and its failures never surface here.
pub async fn set_handler(
    State(state): State<NodeAppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.node.set_value(&req.namespace, &req.key, req.value);
    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<NodeAppState>) -> Json<StatsResponse> {
    Json(state.node.stats())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
