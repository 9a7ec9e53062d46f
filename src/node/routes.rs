//! Node API Routes
//!
//! Configures the Axum router for a cache node.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{get_handler, health_handler, set_handler, stats_handler, NodeAppState};

/// Creates the node router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a value
/// - `GET /get/:namespace/:key` - Retrieve a value
/// - `GET /stats` - Node counters and store occupancy
/// - `GET /health` - Health check endpoint
pub fn create_node_router(state: NodeAppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:namespace/:key", get(get_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
