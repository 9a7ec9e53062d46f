//! Sync Engine Module
//!
//! Brings a node's store in line with its shard peers: a one-time catch-up
//! read of everything already in the log, and a standing watch that applies
//! remote writes as they land.
//!
//! The watch is subscribed and the catch-up read completes before the node
//! starts serving; a log store that cannot be reached at startup is fatal.
//! Watch and catch-up run concurrently, so a record may be delivered by
//! both, which is harmless because the last-writer-wins merge is idempotent.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::Result;
use crate::node::NodeState;
use crate::replication::{LogEvent, ReplicationRecord};

// == Init ==
/// Subscribes the live watch, spawns its loop, then runs catch-up.
///
/// Returns an error (fatal to node startup) if the log cannot be read or
/// the watch cannot be established: the node must not begin serving while
/// reads could silently miss already-replicated state.
pub async fn init_watch_and_sync(node: Arc<NodeState>) -> Result<()> {
    let rx = node.log.watch_prefix(&node.shard_prefix()).await?;
    tokio::spawn(watch_cache(Arc::clone(&node), rx));
    catch_up(&node).await
}

// == Catch-up ==
/// Reads every record currently stored under the node's shard prefix and
/// applies it through the merge rule.
async fn catch_up(node: &NodeState) -> Result<()> {
    info!(prefix = %node.shard_prefix(), "syncing existing stash of cache");
    let events = node.log.read_prefix(&node.shard_prefix()).await?;
    info!("found {} keys to sync", events.len());
    for event in events {
        let record = match ReplicationRecord::decode(&event.value) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %event.path, "error syncing key: {}", e);
                continue;
            }
        };
        node.apply_sync(&record.key, record.value);
    }
    info!("sync successfully completed");
    Ok(())
}

// == Live Watch ==
/// Applies change events until the subscription ends at node shutdown.
async fn watch_cache(node: Arc<NodeState>, mut rx: mpsc::Receiver<LogEvent>) {
    info!(prefix = %node.shard_prefix(), "setting up watch");
    while let Some(event) = rx.recv().await {
        process_cache_event(&node, event);
    }
    info!("watch channel closed, stopping sync");
}

/// Decodes and applies one watch event.
///
/// A decode failure is isolated to the event; the watch loop survives.
/// Events originating from this node are discarded; a node must never
/// re-apply its own writes.
fn process_cache_event(node: &NodeState, event: LogEvent) {
    let record = match ReplicationRecord::decode(&event.value) {
        Ok(record) => record,
        Err(e) => {
            warn!(path = %event.path, "error syncing key: {}", e);
            return;
        }
    };
    if record.source == node.addr {
        return; // ignore self updates
    }
    node.apply_sync(&record.key, record.value);
}
