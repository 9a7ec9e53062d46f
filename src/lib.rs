//! Shardcache - a horizontally-sharded, replicated in-memory cache
//!
//! Keys are partitioned across independent cache nodes by a deterministic
//! hash; each node holds a byte-bounded concurrent LRU store and replicates
//! its writes to shard peers through a durable, watchable log, reconciling
//! with a last-writer-wins rule. A stateless front-end router forwards
//! client requests to the owning shard.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod node;
pub mod replication;
pub mod router;
pub mod shard;

pub use config::{NodeConfig, RouterConfig};
pub use error::CacheError;
pub use node::{create_node_router, NodeAppState, NodeState};
pub use router::{create_router, RouterAppState};
