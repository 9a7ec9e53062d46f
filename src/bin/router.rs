//! Front-end router binary.
//!
//! Stateless: maps each request to its cache shard and forwards it to a
//! node serving that shard.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shardcache::config::RouterConfig;
use shardcache::router::{create_router, RouterAppState, StaticDirectory};

/// Main entry point for the front-end router.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the shard directory from the configured node addresses
/// 4. Start the HTTP server; handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shardcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting shardcache router");

    let config = RouterConfig::from_env();
    info!(
        "Configuration loaded: shard_count={}, port={}",
        config.shard_count, config.server_port
    );

    // Every shard needs at least one node, otherwise a slice of the
    // keyspace would be permanently unavailable.
    if config.shard_nodes.len() != config.shard_count {
        bail!(
            "no. of shards ({}) != no. of configured shard node lists ({})",
            config.shard_count,
            config.shard_nodes.len()
        );
    }

    let directory = Arc::new(StaticDirectory::with_nodes(config.shard_nodes.clone()));
    let state = RouterAppState::new(config.shard_count, directory);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Router serving {} shards on http://{}", config.shard_count, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Router shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating shutdown...");
        }
    }
}
