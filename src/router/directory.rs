//! Shard Directory Module
//!
//! The address book mapping a shard number to the live node addresses
//! serving it. Nodes register themselves once at startup; the router
//! resolves a shard on every forwarded request.
//!
//! Real deployments back this with a discovery service; the static
//! implementation here is seeded from configuration and is what tests and
//! single-cluster setups use.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;

// == Shard Directory Trait ==
/// Shard number -> live node addresses.
#[async_trait]
pub trait ShardDirectory: Send + Sync {
    /// Registers a node as serving `shard`. Returns the registered path,
    /// an opaque identifier for the registration.
    async fn register(&self, shard: usize, addr: &str) -> Result<String>;

    /// Resolves the node addresses currently registered for `shard`.
    /// An unknown shard resolves to an empty list, not an error.
    async fn resolve(&self, shard: usize) -> Result<Vec<String>>;
}

// == Static Directory ==
/// In-memory [`ShardDirectory`] seeded from configuration.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    nodes: RwLock<HashMap<usize, Vec<String>>>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory pre-seeded with per-shard addresses.
    pub fn with_nodes(nodes: HashMap<usize, Vec<String>>) -> Self {
        Self {
            nodes: RwLock::new(nodes),
        }
    }
}

#[async_trait]
impl ShardDirectory for StaticDirectory {
    async fn register(&self, shard: usize, addr: &str) -> Result<String> {
        let mut nodes = self.nodes.write();
        let addrs = nodes.entry(shard).or_default();
        if !addrs.iter().any(|a| a == addr) {
            addrs.push(addr.to_string());
        }
        Ok(format!("shardcache/resolver/{}/{}", shard, addr))
    }

    async fn resolve(&self, shard: usize) -> Result<Vec<String>> {
        Ok(self.nodes.read().get(&shard).cloned().unwrap_or_default())
    }
}
