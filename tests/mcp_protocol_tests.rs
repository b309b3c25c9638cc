//! Tests for MCP dispatch and the HTTP transport

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request as HttpRequest, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use poi_mcp_server::{
    api::create_router,
    config::Config,
    mcp::{
        handler::{handle_mcp_request, SERVER_NAME},
        protocol::{error_codes, Request},
        schema::TOOL_NAME,
    },
    AppState,
};

fn test_state() -> AppState {
    // Nothing in these tests reaches the network.
    let config = Config::new("test-token", "http://127.0.0.1:9/api/v1/inventions").unwrap();
    AppState::new(config).unwrap()
}

fn request(value: Value) -> Request {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_initialize() {
    let response = handle_mcp_request(
        request(json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} })),
        test_state(),
    )
    .await
    .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], json!(SERVER_NAME));
    assert!(result["capabilities"]["tools"].is_object());
    assert_eq!(response.id, json!(1));
}

#[tokio::test]
async fn test_tools_list_exposes_single_tool() {
    let response = handle_mcp_request(
        request(json!({ "jsonrpc": "2.0", "id": "list", "method": "tools/list" })),
        test_state(),
    )
    .await
    .unwrap();

    let tools = response.result.unwrap()["tools"].clone();
    let tools = tools.as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], json!(TOOL_NAME));
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["filepath"]));
    assert!(tools[0]["outputSchema"]["properties"]["transaction_request"].is_object());
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let response = handle_mcp_request(
        request(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" })),
        test_state(),
    )
    .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_ping_and_unknown_method() {
    let state = test_state();

    let pong = handle_mcp_request(request(json!({ "id": 5, "method": "ping" })), state.clone())
        .await
        .unwrap();
    assert_eq!(pong.result, Some(json!({})));

    let unknown = handle_mcp_request(request(json!({ "id": 6, "method": "resources/list" })), state)
        .await
        .unwrap();
    assert_eq!(unknown.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_tool_calls() {
    let state = test_state();

    let cases = vec![
        json!({ "id": 1, "method": "tools/call" }),
        json!({ "id": 2, "method": "tools/call", "params": { "arguments": { "filepath": "a" } } }),
        json!({ "id": 3, "method": "tools/call", "params": { "name": "get_balance", "arguments": {} } }),
    ];
    for case in cases {
        let response = handle_mcp_request(request(case), state.clone()).await.unwrap();
        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }
}

#[tokio::test]
async fn test_direct_method_alias_runs_tool() {
    let response = handle_mcp_request(
        request(json!({
            "id": 9,
            "method": TOOL_NAME,
            "params": { "filepath": "/definitely/not/here.pdf" }
        })),
        test_state(),
    )
    .await
    .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["isError"], json!(true));
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("/definitely/not/here.pdf"));
}

#[tokio::test]
async fn test_http_health() {
    let app = create_router(test_state());
    let response = app
        .oneshot(
            HttpRequest::builder()
                .method(Method::GET)
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], json!("ok"));
    assert_eq!(value["open_uploads"], json!(0));
}

#[tokio::test]
async fn test_http_rpc_forwards_to_handler() {
    let app = create_router(test_state());
    let response = app
        .oneshot(
            HttpRequest::builder()
                .method(Method::POST)
                .uri("/api/rpc")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }))
                        .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["result"]["tools"][0]["name"], json!(TOOL_NAME));
}

#[tokio::test]
async fn test_http_rpc_rejects_notifications() {
    let app = create_router(test_state());
    let response = app
        .oneshot(
            HttpRequest::builder()
                .method(Method::POST)
                .uri("/api/rpc")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["error"]["code"], json!(error_codes::INVALID_REQUEST));
}
