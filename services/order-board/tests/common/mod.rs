//! Common test utilities and fixtures

#![allow(dead_code)]

use std::sync::{Arc, Once};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_board::{
    BoardConfig, InMemoryOrderStore, OrderBoardServer, SqliteOrderStore, config::MEMORY_DATABASE,
};

/// Ensure tracing is initialized only once across all tests
static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "order_board=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// Create a test configuration suitable for testing
pub fn create_test_config() -> BoardConfig {
    let mut config = BoardConfig::default();
    config.server.port = 0; // Random port for tests
    config.database.url = MEMORY_DATABASE.to_string();
    config.notifier.channel_capacity = 64;
    config.monitoring.metrics_enabled = false;
    config
}

/// Server over a fresh in-memory store
pub fn memory_server() -> OrderBoardServer {
    init_test_env();
    OrderBoardServer::with_store(create_test_config(), Arc::new(InMemoryOrderStore::new()))
}

/// Server over a fresh in-memory SQLite database
pub async fn sqlite_server() -> OrderBoardServer {
    init_test_env();
    let store = SqliteOrderStore::connect("sqlite::memory:", 1)
        .await
        .unwrap();
    OrderBoardServer::with_store(create_test_config(), Arc::new(store))
}

/// Send a request through the router and decode the JSON response
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// `POST` a JSON body
pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

/// `GET` and decode JSON
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}
