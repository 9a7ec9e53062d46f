//! Replication Log Module
//!
//! The durable, watchable key/value store replicas converge through, seen
//! by the rest of the system as a prefix-addressable interface: write a
//! record at a path, read everything under a prefix, watch a prefix for
//! changes.
//!
//! Production deployments back this with an external log store; the
//! in-memory implementation here serves tests and single-process clusters,
//! and doubles as the reference for the trait's semantics.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};

use crate::error::Result;

/// Buffered events per watcher before lag drops the subscription.
const WATCH_BUFFER: usize = 1024;

// == Log Event ==
/// A change notification: the path that was written and the raw record
/// bytes now stored there.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// Full log path of the write
    pub path: String,
    /// Serialized record value
    pub value: Vec<u8>,
}

// == Replication Log Trait ==
/// Prefix-addressable, watchable key/value store.
///
/// A put to an existing path overwrites the prior value; watchers observe
/// every put under their prefix, in arrival order per watcher.
#[async_trait]
pub trait ReplicationLog: Send + Sync {
    /// Writes `value` at `path`, overwriting any prior value.
    async fn put(&self, path: &str, value: Vec<u8>) -> Result<()>;

    /// Reads every `(path, value)` currently stored under `prefix`.
    async fn read_prefix(&self, prefix: &str) -> Result<Vec<LogEvent>>;

    /// Subscribes to future puts under `prefix`.
    ///
    /// The subscription is long-lived; it is only torn down when the
    /// receiver is dropped (node shutdown).
    async fn watch_prefix(&self, prefix: &str) -> Result<mpsc::Receiver<LogEvent>>;
}

// == Memory Log ==
/// In-process [`ReplicationLog`] backed by a concurrent map and a broadcast
/// channel.
///
/// Clones share the same storage, so every node handed a clone of one
/// `MemoryLog` sees the same log, which is how tests stand up a
/// multi-replica cluster in a single process.
#[derive(Debug, Clone)]
pub struct MemoryLog {
    entries: std::sync::Arc<DashMap<String, Vec<u8>>>,
    events: broadcast::Sender<LogEvent>,
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(WATCH_BUFFER);
        Self {
            entries: std::sync::Arc::new(DashMap::new()),
            events,
        }
    }
}

#[async_trait]
impl ReplicationLog for MemoryLog {
    async fn put(&self, path: &str, value: Vec<u8>) -> Result<()> {
        self.entries.insert(path.to_string(), value.clone());
        // No receivers is fine: nothing is watching yet.
        let _ = self.events.send(LogEvent {
            path: path.to_string(),
            value,
        });
        Ok(())
    }

    async fn read_prefix(&self, prefix: &str) -> Result<Vec<LogEvent>> {
        Ok(self
            .entries
            .iter()
            .filter(|kv| kv.key().starts_with(prefix))
            .map(|kv| LogEvent {
                path: kv.key().clone(),
                value: kv.value().clone(),
            })
            .collect())
    }

    async fn watch_prefix(&self, prefix: &str) -> Result<mpsc::Receiver<LogEvent>> {
        let mut all_events = self.events.subscribe();
        let (tx, rx) = mpsc::channel(WATCH_BUFFER);
        let prefix = prefix.to_string();
        tokio::spawn(async move {
            loop {
                match all_events.recv().await {
                    Ok(event) => {
                        if !event.path.starts_with(&prefix) {
                            continue;
                        }
                        if tx.send(event).await.is_err() {
                            return; // watcher dropped
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "watch fell behind, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        });
        Ok(rx)
    }
}
