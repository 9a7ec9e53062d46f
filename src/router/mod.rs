//! Router Module
//!
//! The stateless front-end: maps each request to its cache shard, obtains a
//! node for that shard from the shard directory, forwards the call, and
//! translates node-level failures into client-facing error codes.
//!
//! The router holds no cache state, so it can restart or be replicated
//! horizontally without coordination.

mod client;
mod directory;
pub mod handlers;
pub mod routes;

pub use client::NodeClient;
pub use directory::{ShardDirectory, StaticDirectory};
pub use handlers::RouterAppState;
pub use routes::create_router;
