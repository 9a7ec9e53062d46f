//! Router API Handlers
//!
//! HTTP request handlers for the front-end router: shard selection plus
//! forwarding. The handlers own no cache state.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::{GetResponse, HealthResponse, SetRequest, SetResponse};
use crate::router::{NodeClient, ShardDirectory};
use crate::shard::shard_for;

/// Application state shared across all router handlers.
#[derive(Clone)]
pub struct RouterAppState {
    /// Number of cache shards the keyspace is split into
    pub shard_count: usize,
    /// Shard number -> node addresses
    pub directory: Arc<dyn ShardDirectory>,
    /// Shared connection pool for node clients
    http: reqwest::Client,
}

impl RouterAppState {
    /// Creates router state over a shard directory.
    pub fn new(shard_count: usize, directory: Arc<dyn ShardDirectory>) -> Self {
        Self {
            shard_count,
            directory,
            http: reqwest::Client::new(),
        }
    }

    /// Resolves a client for the shard owning `(namespace, key)`.
    ///
    /// A shard with no registered node is an Unavailable-class failure.
    async fn client_for(&self, namespace: &str, key: &str) -> Result<NodeClient> {
        let shard = shard_for(namespace, key, self.shard_count);
        let addrs = self.directory.resolve(shard).await?;
        let addr = addrs
            .first()
            .ok_or_else(|| CacheError::Unavailable("No cache server available.".to_string()))?;
        Ok(NodeClient::new(self.http.clone(), addr))
    }
}

/// Handler for GET /get/:namespace/:key
///
/// Forwards to the owning node. NotFound propagates as-is; an unreachable
/// node surfaces as 503.
pub async fn get_handler(
    State(state): State<RouterAppState>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    debug!(ns = %namespace, k = %key, "get");
    let client = state.client_for(&namespace, &key).await?;
    let response = client.get(&namespace, &key).await?;
    Ok(Json(response))
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<RouterAppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    debug!(ns = %req.namespace, k = %req.key, "set");
    let client = state.client_for(&req.namespace, &req.key).await?;
    let response = client.set(&req).await?;
    Ok(Json(response))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
