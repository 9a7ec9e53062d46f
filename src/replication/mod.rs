//! Replication Module
//!
//! Cross-replica synchronization: the durable-log record format and path
//! scheme, the watchable log abstraction, and the sync engine that keeps a
//! node's store converged with its shard peers.

mod log;
mod record;
mod sync;

pub use log::{LogEvent, MemoryLog, ReplicationLog};
pub use record::{key_path, shard_prefix, ReplicationRecord};
pub use sync::init_watch_and_sync;
