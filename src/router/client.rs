//! Node Client Module
//!
//! HTTP client for forwarding a request to a cache node, translating
//! transport and status failures into the service error taxonomy:
//! connection-level trouble is Unavailable, a 404 from the node propagates
//! as NotFound, anything else unexpected is Internal.

use reqwest::StatusCode;

use crate::error::{CacheError, Result};
use crate::models::{ErrorResponse, GetResponse, SetRequest, SetResponse};

// == Node Client ==
/// Client handle for one cache node.
#[derive(Debug, Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl NodeClient {
    /// Creates a client for the node at `addr` (host:port), reusing the
    /// router's shared connection pool.
    pub fn new(http: reqwest::Client, addr: &str) -> Self {
        Self {
            http,
            base_url: format!("http://{}", addr),
        }
    }

    // == Get ==
    /// Forwards a Get to the node.
    pub async fn get(&self, namespace: &str, key: &str) -> Result<GetResponse> {
        let url = format!("{}/get/{}/{}", self.base_url, namespace, key);
        let response = self.http.get(&url).send().await.map_err(map_transport)?;
        match response.status() {
            StatusCode::OK => response
                .json::<GetResponse>()
                .await
                .map_err(|e| CacheError::Internal(format!("decoding node response: {}", e))),
            StatusCode::NOT_FOUND => Err(CacheError::NotFound(node_error(response).await)),
            _ => Err(CacheError::Internal(node_error(response).await)),
        }
    }

    // == Set ==
    /// Forwards a Set to the node.
    pub async fn set(&self, req: &SetRequest) -> Result<SetResponse> {
        let url = format!("{}/set", self.base_url);
        let response = self
            .http
            .put(&url)
            .json(req)
            .send()
            .await
            .map_err(map_transport)?;
        match response.status() {
            StatusCode::OK => response
                .json::<SetResponse>()
                .await
                .map_err(|e| CacheError::Internal(format!("decoding node response: {}", e))),
            _ => Err(CacheError::Internal(node_error(response).await)),
        }
    }
}

/// Maps a reqwest transport failure: anything connection-shaped means the
/// node is unreachable (Unavailable); the rest is Internal.
fn map_transport(err: reqwest::Error) -> CacheError {
    if err.is_connect() || err.is_timeout() {
        CacheError::Unavailable("No cache server available.".to_string())
    } else {
        CacheError::Internal(err.to_string())
    }
}

/// Extracts the node's error message from a non-OK response body.
async fn node_error(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => format!("node returned status {}", status),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_node_maps_to_unavailable() {
        // Nothing listens on this port; the connect error must surface as
        // Unavailable, not Internal.
        let client = NodeClient::new(reqwest::Client::new(), "127.0.0.1:1");
        let err = client.get("ns", "k").await.unwrap_err();
        assert!(matches!(err, CacheError::Unavailable(_)));
    }
}
