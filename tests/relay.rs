//! Integration tests for the chat relay endpoints.
//!
//! These tests spin up the real application on a random port, plus small
//! mock upstreams standing in for the ADK service and the completions API.

use agentdeck::config::{Config, DatabaseConfig, RelayConfig, RuntimeConfig, ServerConfig};
use agentdeck::create_app;
use axum::{http::StatusCode, response::Json, routing::post, Router};
use serde_json::{json, Value};

/// Build a test configuration with an isolated data directory.
fn test_config(adk_url: &str, openrouter_url: &str) -> Config {
    let data_dir = std::env::temp_dir().join(format!("agentdeck-relay-{}", uuid::Uuid::new_v4()));
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            data_dir: data_dir.to_string_lossy().into_owned(),
        },
        relay: RelayConfig {
            adk_service_url: adk_url.to_string(),
            openrouter_api_url: openrouter_url.to_string(),
            openrouter_api_key: Some("test-key".to_string()),
            chat_model: "openai/gpt-3.5-turbo".to_string(),
        },
        runtime: RuntimeConfig::instant(),
    }
}

/// Serve a router on a random port and return the base URL.
async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service()).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Start the application against the given upstream base URLs.
async fn start_app(adk_url: &str, openrouter_url: &str) -> String {
    let app = create_app(test_config(adk_url, openrouter_url)).await.unwrap();
    spawn_server(app).await
}

/// Helper to POST JSON and return (status, parsed body).
async fn post_json(base: &str, path: &str, body: Value) -> (u16, Value) {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}{}", base, path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap();
    (status, body)
}

/// Mock ADK service answering every prompt with a fixed response.
fn healthy_adk() -> Router {
    Router::new().route(
        "/invoke_agent",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["prompt"], "hi");
            Json(json!({ "response": "hello" }))
        }),
    )
}

/// Mock ADK service that always fails.
fn failing_adk() -> Router {
    Router::new().route(
        "/invoke_agent",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    )
}

/// Mock completions API answering with one assistant choice.
fn healthy_completions() -> Router {
    Router::new().route(
        "/chat/completions",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["model"], "openai/gpt-3.5-turbo");
            assert_eq!(body["messages"][0]["role"], "system");
            assert_eq!(body["messages"][1]["role"], "user");
            Json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "Hi from the assistant" } }
                ]
            }))
        }),
    )
}

/// Mock completions API that always fails.
fn failing_completions() -> Router {
    Router::new().route(
        "/chat/completions",
        post(|| async { StatusCode::BAD_GATEWAY }),
    )
}

// ============================================================================
// /api/adk-chat
// ============================================================================

#[tokio::test]
async fn adk_chat_without_prompt_returns_400() {
    let base = start_app("http://127.0.0.1:1", "http://127.0.0.1:1").await;

    let (status, body) = post_json(&base, "/api/adk-chat", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "No prompt provided." }));
}

/// Helper to POST a raw body with a JSON content type.
async fn post_raw(base: &str, path: &str, body: &str) -> (u16, Value) {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}{}", base, path))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn adk_chat_with_empty_body_returns_contract_error() {
    let base = start_app("http://127.0.0.1:1", "http://127.0.0.1:1").await;

    let (status, body) = post_raw(&base, "/api/adk-chat", "").await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "No prompt provided." }));
}

#[tokio::test]
async fn adk_chat_with_malformed_body_returns_contract_error() {
    let base = start_app("http://127.0.0.1:1", "http://127.0.0.1:1").await;

    let (status, body) = post_raw(&base, "/api/adk-chat", "{not json").await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "No prompt provided." }));
}

#[tokio::test]
async fn adk_chat_with_empty_prompt_returns_400() {
    let base = start_app("http://127.0.0.1:1", "http://127.0.0.1:1").await;

    let (status, body) = post_json(&base, "/api/adk-chat", json!({ "prompt": "" })).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "No prompt provided." }));
}

#[tokio::test]
async fn adk_chat_returns_upstream_body_verbatim() {
    let adk = spawn_server(healthy_adk()).await;
    let base = start_app(&adk, "http://127.0.0.1:1").await;

    let (status, body) = post_json(&base, "/api/adk-chat", json!({ "prompt": "hi" })).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "response": "hello" }));
}

#[tokio::test]
async fn adk_chat_maps_upstream_failure_to_500() {
    let adk = spawn_server(failing_adk()).await;
    let base = start_app(&adk, "http://127.0.0.1:1").await;

    let (status, body) = post_json(&base, "/api/adk-chat", json!({ "prompt": "hi" })).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Failed to get response from ADK service." }));
}

#[tokio::test]
async fn adk_chat_maps_unreachable_upstream_to_500() {
    // Nothing listens on port 1
    let base = start_app("http://127.0.0.1:1", "http://127.0.0.1:1").await;

    let (status, body) = post_json(&base, "/api/adk-chat", json!({ "prompt": "hi" })).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Failed to get response from ADK service." }));
}

// ============================================================================
// /api/chat
// ============================================================================

#[tokio::test]
async fn chat_without_message_returns_400() {
    let base = start_app("http://127.0.0.1:1", "http://127.0.0.1:1").await;

    let (status, body) = post_json(&base, "/api/chat", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "No message provided." }));
}

#[tokio::test]
async fn chat_with_malformed_body_returns_contract_error() {
    let base = start_app("http://127.0.0.1:1", "http://127.0.0.1:1").await;

    let (status, body) = post_raw(&base, "/api/chat", "").await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "No message provided." }));
}

#[tokio::test]
async fn chat_returns_assistant_reply() {
    let completions = spawn_server(healthy_completions()).await;
    let base = start_app("http://127.0.0.1:1", &completions).await;

    let (status, body) = post_json(&base, "/api/chat", json!({ "message": "hello" })).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "Hi from the assistant" }));
}

#[tokio::test]
async fn chat_falls_back_when_upstream_has_no_choices() {
    let completions = spawn_server(Router::new().route(
        "/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    ))
    .await;
    let base = start_app("http://127.0.0.1:1", &completions).await;

    let (status, body) = post_json(&base, "/api/chat", json!({ "message": "hello" })).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "No response from AI." }));
}

#[tokio::test]
async fn chat_maps_upstream_failure_to_500() {
    let completions = spawn_server(failing_completions()).await;
    let base = start_app("http://127.0.0.1:1", &completions).await;

    let (status, body) = post_json(&base, "/api/chat", json!({ "message": "hello" })).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Failed to get response from AI." }));
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_check_answers_ok() {
    let base = start_app("http://127.0.0.1:1", "http://127.0.0.1:1").await;

    let resp = reqwest::get(format!("{}/healthz", base)).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}
