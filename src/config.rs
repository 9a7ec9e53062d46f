//! Configuration Module
//!
//! Handles loading and managing node and router configuration from
//! environment variables.

use std::collections::HashMap;
use std::env;

// == Node Config ==
/// Configuration for a cache node.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// HTTP server port
    pub server_port: u16,
    /// Cache shard this node serves
    pub shard: usize,
    /// Maximum total cache size in bytes
    pub max_cache_bytes: i64,
    /// Address advertised to the shard directory and stamped on
    /// replication records (self-echo suppression compares against it)
    pub advertise_addr: String,
    /// Replication-log path prefix shared by all nodes of the cluster
    pub cache_prefix: String,
}

impl NodeConfig {
    /// Creates a new NodeConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SHARD` - shard number served by this node (default: 0)
    /// - `MAX_CACHE_BYTES` - byte budget (default: 1 GiB)
    /// - `ADVERTISE_ADDR` - advertised address (default: `127.0.0.1:<port>`)
    /// - `CACHE_PREFIX` - replication-log prefix (default: `shardcache/cache`)
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);
        Self {
            server_port,
            shard: env::var("SHARD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            max_cache_bytes: env::var("MAX_CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000_000_000),
            advertise_addr: env::var("ADVERTISE_ADDR")
                .unwrap_or_else(|_| format!("127.0.0.1:{}", server_port)),
            cache_prefix: env::var("CACHE_PREFIX")
                .unwrap_or_else(|_| "shardcache/cache".to_string()),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            shard: 0,
            max_cache_bytes: 1_000_000_000,
            advertise_addr: "127.0.0.1:3000".to_string(),
            cache_prefix: "shardcache/cache".to_string(),
        }
    }
}

// == Router Config ==
/// Configuration for the stateless front-end router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// HTTP server port
    pub server_port: u16,
    /// Number of cache shards the keyspace is split into
    pub shard_count: usize,
    /// Node addresses per shard, e.g. shard 0 -> ["127.0.0.1:3001"]
    pub shard_nodes: HashMap<usize, Vec<String>>,
}

impl RouterConfig {
    /// Creates a new RouterConfig by loading values from environment
    /// variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SHARD_COUNT` - number of cache shards (default: 1)
    /// - `SHARD_NODES` - per-shard node addresses in the form
    ///   `0=host:port|host:port;1=host:port` (default: empty)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            shard_count: env::var("SHARD_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            shard_nodes: env::var("SHARD_NODES")
                .map(|v| parse_shard_nodes(&v))
                .unwrap_or_default(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            shard_count: 1,
            shard_nodes: HashMap::new(),
        }
    }
}

/// Parses the `SHARD_NODES` mapping.
///
/// Entries are separated by `;`, each entry is `<shard>=<addr>|<addr>|...`.
/// Malformed entries are skipped.
fn parse_shard_nodes(spec: &str) -> HashMap<usize, Vec<String>> {
    let mut nodes = HashMap::new();
    for entry in spec.split(';').filter(|e| !e.is_empty()) {
        let Some((shard, addrs)) = entry.split_once('=') else {
            continue;
        };
        let Ok(shard) = shard.trim().parse::<usize>() else {
            continue;
        };
        let addrs: Vec<String> = addrs
            .split('|')
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if !addrs.is_empty() {
            nodes.insert(shard, addrs);
        }
    }
    nodes
}
