//! Integration Tests for the Cache Node API
//!
//! Tests full request/response cycle for each node endpoint, plus the
//! eviction and accounting behavior observable through the API.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use shardcache::cache::{LruStore, RecencyTracker};
use shardcache::config::NodeConfig;
use shardcache::node::{create_node_router, NodeAppState, NodeState};
use shardcache::replication::MemoryLog;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_app_with_budget(1_000_000)
}

/// Node with a strict (single list shard) LRU so eviction order is
/// deterministic in tests.
fn create_app_with_budget(max_bytes: i64) -> Router {
    let store = LruStore::with_tracker(max_bytes, RecencyTracker::with_shard_count(1));
    let node = NodeState::new(
        &NodeConfig::default(),
        store,
        Arc::new(MemoryLog::new()),
    );
    create_node_router(NodeAppState::new(Arc::new(node)))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn do_set(app: &Router, namespace: &str, key: &str, value: &str) -> StatusCode {
    let body = serde_json::json!({
        "namespace": namespace,
        "key": key,
        "value": value,
    });
    app.clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

async fn do_get(app: &Router, namespace: &str, key: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/get/{}/{}", namespace, key))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn do_stats(app: &Router) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    body_to_json(response.into_body()).await
}

/// Bounded wait for detached accounting/eviction tasks to converge.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// == SET / GET Tests ==

#[tokio::test]
async fn test_set_then_get_roundtrip() {
    let app = create_test_app();

    assert_eq!(do_set(&app, "users", "alice", "hello").await, StatusCode::OK);

    let (status, json) = do_get(&app, "users", "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["namespace"].as_str().unwrap(), "users");
    assert_eq!(json["key"].as_str().unwrap(), "alice");
    assert_eq!(json["value"].as_str().unwrap(), "hello");
}

#[tokio::test]
async fn test_get_absent_key_is_404_not_empty_value() {
    let app = create_test_app();

    let (status, json) = do_get(&app, "users", "nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
    assert!(json.get("value").is_none());
}

#[tokio::test]
async fn test_set_empty_key_is_rejected() {
    let app = create_test_app();
    assert_eq!(do_set(&app, "ns", "", "v").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overwrite_returns_latest_value() {
    let app = create_test_app();

    do_set(&app, "ns", "k", "first").await;
    do_set(&app, "ns", "k", "second").await;

    let (_, json) = do_get(&app, "ns", "k").await;
    assert_eq!(json["value"].as_str().unwrap(), "second");
}

#[tokio::test]
async fn test_namespaces_share_one_keyspace_by_concatenation() {
    let app = create_test_app();

    // ("ab","c") and ("a","bc") concatenate identically and are therefore
    // the same physical key. Accepted behavior of the key scheme.
    do_set(&app, "ab", "c", "via_ab").await;
    let (status, json) = do_get(&app, "a", "bc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"].as_str().unwrap(), "via_ab");
}

// == Eviction Tests ==

#[tokio::test]
async fn test_eviction_after_budget_exceeded() {
    let app = create_app_with_budget(100);

    // Ten 10-byte values fill the budget exactly.
    for i in 1..=10 {
        do_set(&app, "ns", &format!("key_{}", i), "0123456789").await;
        settle().await;
    }
    let stats = do_stats(&app).await;
    assert_eq!(stats["key_count"].as_u64().unwrap(), 10);
    assert_eq!(stats["current_bytes"].as_i64().unwrap(), 100);

    // The eleventh evicts the least recently used key.
    do_set(&app, "ns", "key_11", "0123456789").await;
    settle().await;

    let stats = do_stats(&app).await;
    assert_eq!(stats["key_count"].as_u64().unwrap(), 10);
    assert_eq!(stats["current_bytes"].as_i64().unwrap(), 100);

    let (status, _) = do_get(&app, "ns", "key_1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = do_get(&app, "ns", "key_11").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_recently_read_key_survives_eviction() {
    let app = create_app_with_budget(30);

    do_set(&app, "ns", "a", "0123456789").await;
    settle().await;
    do_set(&app, "ns", "b", "0123456789").await;
    settle().await;
    do_set(&app, "ns", "c", "0123456789").await;
    settle().await;

    // Reading "a" refreshes it; the next overflow must evict "b" instead.
    do_get(&app, "ns", "a").await;
    settle().await;
    do_set(&app, "ns", "d", "0123456789").await;
    settle().await;

    let (status, _) = do_get(&app, "ns", "a").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = do_get(&app, "ns", "b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Stats Tests ==

#[tokio::test]
async fn test_stats_reflect_traffic() {
    let app = create_test_app();

    do_set(&app, "ns", "a", "12345").await;
    do_set(&app, "ns", "b", "12345").await;
    do_get(&app, "ns", "a").await;
    do_get(&app, "ns", "missing").await;
    settle().await;

    let stats = do_stats(&app).await;
    assert_eq!(stats["set_count"].as_u64().unwrap(), 2);
    assert_eq!(stats["get_count"].as_u64().unwrap(), 2);
    assert_eq!(stats["total_count"].as_u64().unwrap(), 4);
    assert_eq!(stats["key_count"].as_u64().unwrap(), 2);
    assert_eq!(stats["current_bytes"].as_i64().unwrap(), 10);
    assert_eq!(stats["shard"].as_u64().unwrap(), 0);
}

// == Health Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
}
