//! Node Module
//!
//! The Cache Node Service: one shard's in-memory cache behind an HTTP
//! surface, with write-through to the local LRU store and asynchronous
//! append to the replication log.

pub mod handlers;
pub mod routes;
mod service;

pub use handlers::NodeAppState;
pub use routes::create_node_router;
pub use service::NodeState;
