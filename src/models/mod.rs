//! Models Module
//!
//! Request and response DTOs shared by the node and router HTTP surfaces.
//! The router mirrors the node's wire format, which is what lets it forward
//! bodies without re-encoding.

mod requests;
mod responses;

pub use requests::SetRequest;
pub use responses::{ErrorResponse, GetResponse, HealthResponse, SetResponse, StatsResponse};
