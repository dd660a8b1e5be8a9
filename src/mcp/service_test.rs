//! Tests for the Streamable HTTP service

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::ACCEPT, header::CONTENT_TYPE},
};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::client::fake::FakeClient;
use crate::config::ServerSettings;

fn app() -> Router {
    let service = super::create_mcp_service(
        Arc::new(FakeClient::new()),
        ServerSettings::default(),
        CancellationToken::new(),
    );
    Router::new().nest_service("/mcp", service)
}

#[tokio::test]
async fn test_only_mcp_path_is_mounted() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mcp_path_responds() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/mcp")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_ne!(
        response.status(),
        StatusCode::NOT_FOUND,
        "Service should be mounted and responding"
    );
}

#[tokio::test]
async fn test_initialize_opens_session() {
    let initialize = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": { "name": "test", "version": "0.0.0" }
        }
    }"#;

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("host", "localhost")
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json, text/event-stream")
                .body(Body::from(initialize))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("mcp-session-id"));
}
