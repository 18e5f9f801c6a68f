/// ADK agent service client
///
/// Forwards a prompt to the ADK service's invoke_agent endpoint and returns
/// the upstream JSON body untouched. The relay adds nothing: no retries, no
/// timeout policy, no response shaping.

use anyhow::Result;
use serde_json::{json, Value};

/// Thin client for the ADK agent service
#[derive(Debug, Clone)]
pub struct AdkClient {
    /// Service base URL (e.g., "http://localhost:8008")
    base_url: String,
    /// Shared HTTP client
    http: reqwest::Client,
}

impl AdkClient {
    /// Create a client for the given service base URL
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// POST the prompt to {base}/invoke_agent and return the JSON body verbatim
    pub async fn invoke_agent(&self, prompt: &str) -> Result<Value> {
        let url = format!("{}/invoke_agent", self.base_url);
        tracing::debug!("🌐 Forwarding prompt to ADK service: {}", url);

        let response = self
            .http
            .post(&url)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<Value>().await?;
        Ok(body)
    }
}
