/// OpenRouter-compatible chat completions client
///
/// Sends a single-turn conversation (fixed system prompt + the user's
/// message) to a chat-completions endpoint with bearer auth and extracts the
/// assistant's reply from the first choice.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// System prompt sent with every assistant request
const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for this project.";

/// Reply text used when the upstream response carries no content
const EMPTY_REPLY: &str = "No response from AI.";

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

/// Client for an OpenRouter-compatible completions API
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    /// API base URL (e.g., "https://openrouter.ai/api/v1")
    api_url: String,
    /// Bearer token; requests go out unauthenticated when unset
    api_key: Option<String>,
    /// Model name sent with every request
    model: String,
    /// Shared HTTP client
    http: reqwest::Client,
}

impl OpenRouterClient {
    /// Create a client for the given API base URL and model
    pub fn new(api_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            api_url,
            api_key,
            model,
            http: reqwest::Client::new(),
        }
    }

    /// Build the completion request body for a user message
    fn build_request_body(&self, message: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: message.to_string(),
                },
            ],
        }
    }

    /// Send the user's message and return the assistant's reply text
    ///
    /// Falls back to a fixed string when the upstream answers without
    /// content, matching the relay's original behavior.
    pub async fn complete(&self, message: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_url);
        let body = self.build_request_body(message);

        tracing::debug!("🌐 Forwarding message to completions API: {}", url);

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let completion = response.json::<CompletionResponse>().await?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_else(|| EMPTY_REPLY.to_string());

        Ok(reply)
    }
}
