//! Cache node server binary.
//!
//! Serves one shard's cache over HTTP, replicating writes through the
//! replication log.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shardcache::cache::LruStore;
use shardcache::config::NodeConfig;
use shardcache::node::{create_node_router, NodeAppState, NodeState};
use shardcache::replication::{init_watch_and_sync, MemoryLog};
use shardcache::router::{ShardDirectory, StaticDirectory};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the LRU store and a replication-log handle
/// 4. Start the sync engine (live watch + catch-up), fatal on failure
/// 5. Register this node with the shard directory, fatal on failure
/// 6. Start the HTTP server; handle graceful shutdown on SIGINT/SIGTERM
///
/// The node must not begin serving before sync is established, otherwise
/// reads could silently miss already-replicated state.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shardcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting shardcache node");

    let config = NodeConfig::from_env();
    info!(
        "Configuration loaded: shard={}, max_cache_bytes={}, port={}, addr={}",
        config.shard, config.max_cache_bytes, config.server_port, config.advertise_addr
    );

    let store = LruStore::new(config.max_cache_bytes);

    // Standalone wiring: an in-process log and directory. A clustered
    // deployment injects shared implementations of both behind the same
    // traits.
    let log = Arc::new(MemoryLog::new());
    let directory = StaticDirectory::new();

    let node = Arc::new(NodeState::new(&config, store, log));

    init_watch_and_sync(Arc::clone(&node))
        .await
        .context("sync engine initialization failed")?;
    info!("Sync engine running");

    let registered_path = directory
        .register(config.shard, &config.advertise_addr)
        .await
        .context("shard directory registration failed")?;
    info!("Cache node registered at path {}", registered_path);

    let app = create_node_router(NodeAppState::new(node));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Node serving shard {} on http://{}", config.shard, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Node shutdown complete");
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
