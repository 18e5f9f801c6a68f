/// Chat relay endpoints
///
/// Two stateless pass-throughs: /api/adk-chat forwards a prompt to the ADK
/// agent service and returns its JSON verbatim; /api/chat forwards a message
/// to the completions API under a fixed system prompt. Error bodies are part
/// of the contract and fixed strings on purpose - upstream detail stays in
/// the logs.

use crate::api::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Request body for /api/adk-chat
#[derive(Debug, Default, Deserialize)]
pub struct AdkChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Request body for /api/chat
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Create the chat relay routes
pub fn create_chat_routes() -> Router<AppState> {
    Router::new()
        .route("/api/adk-chat", post(adk_chat))
        .route("/api/chat", post(chat))
}

/// Forward a prompt to the ADK agent service
///
/// POST /api/adk-chat
/// Body: { "prompt": "..." }
/// Success returns the upstream JSON body unchanged.
async fn adk_chat(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    tracing::info!("📥 Received /api/adk-chat request");

    // Empty or malformed bodies get the contract's 400, not a framework
    // rejection
    let payload: AdkChatRequest = serde_json::from_str(&body).unwrap_or_default();

    let prompt = match payload.prompt.as_deref() {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No prompt provided." })),
            ));
        }
    };

    match state.adk.invoke_agent(prompt).await {
        Ok(body) => Ok(Json(body)),
        Err(e) => {
            tracing::error!("ADK service error: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to get response from ADK service." })),
            ))
        }
    }
}

/// Forward a message to the completions API
///
/// POST /api/chat
/// Body: { "message": "..." }
/// Returns: { "message": "<assistant reply>" }
async fn chat(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    tracing::info!("📥 Received /api/chat request");

    let payload: ChatRequest = serde_json::from_str(&body).unwrap_or_default();

    let message = match payload.message.as_deref() {
        Some(message) if !message.is_empty() => message,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No message provided." })),
            ));
        }
    };

    match state.openrouter.complete(message).await {
        Ok(reply) => Ok(Json(json!({ "message": reply }))),
        Err(e) => {
            tracing::error!("AI chat error: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to get response from AI." })),
            ))
        }
    }
}
