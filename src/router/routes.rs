//! Router API Routes
//!
//! Configures the Axum router for the front-end.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{get_handler, health_handler, set_handler, RouterAppState};

/// Creates the front-end router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a value on the owning shard's node
/// - `GET /get/:namespace/:key` - Retrieve a value from the owning shard
/// - `GET /health` - Health check endpoint
pub fn create_router(state: RouterAppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:namespace/:key", get(get_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
