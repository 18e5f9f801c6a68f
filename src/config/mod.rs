/// Configuration management for the Agentdeck backend
///
/// Handles server binding, record-store location, relay upstreams, and the
/// simulated-execution pace. Everything falls back to env vars so the same
/// binary works in containers and local dev.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Record store configuration
    pub database: DatabaseConfig,
    /// Chat relay upstream configuration
    pub relay: RelayConfig,
    /// Simulated workflow execution pace
    pub runtime: RuntimeConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding the SQLite record store (default: "data")
    pub data_dir: String,
}

/// Upstream endpoints for the chat relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Base URL of the ADK agent service (POST {base}/invoke_agent)
    pub adk_service_url: String,
    /// Base URL of the OpenRouter-compatible completions API
    pub openrouter_api_url: String,
    /// Bearer token for the completions API; forwarded as-is when set
    pub openrouter_api_key: Option<String>,
    /// Model name sent with every /api/chat completion request
    pub chat_model: String,
}

/// Per-node-type pause lengths for simulated workflow execution
///
/// The executor sleeps these durations instead of doing real work. Tests set
/// them to zero so runs resolve immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Milliseconds a trigger node "runs" for
    pub trigger_pace_ms: u64,
    /// Milliseconds an agent node "runs" for
    pub agent_pace_ms: u64,
    /// Milliseconds a notifier node "runs" for
    pub notifier_pace_ms: u64,
    /// Milliseconds any other node type "runs" for
    pub custom_pace_ms: u64,
    /// Seconds between agent metric simulation passes
    pub metrics_interval_secs: u64,
}

impl RuntimeConfig {
    /// Zero-pace configuration for tests
    pub fn instant() -> Self {
        Self {
            trigger_pace_ms: 0,
            agent_pace_ms: 0,
            notifier_pace_ms: 0,
            custom_pace_ms: 0,
            metrics_interval_secs: 5,
        }
    }

    /// Interval between metric simulation passes
    pub fn metrics_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_interval_secs)
    }
}

impl Default for RuntimeConfig {
    /// Pace values from the original dashboard's node execution table
    fn default() -> Self {
        Self {
            trigger_pace_ms: 1000,
            agent_pace_ms: 2000,
            notifier_pace_ms: 500,
            custom_pace_ms: 1000,
            metrics_interval_secs: 5,
        }
    }
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("AGENTDECK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("AGENTDECK_PORT")
                    .unwrap_or_else(|_| "8009".to_string())
                    .parse()
                    .unwrap_or(8009),
            },
            database: DatabaseConfig {
                data_dir: std::env::var("AGENTDECK_DATA_DIR")
                    .unwrap_or_else(|_| "data".to_string()),
            },
            relay: RelayConfig {
                adk_service_url: std::env::var("ADK_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:8008".to_string()),
                openrouter_api_url: std::env::var("OPENROUTER_API_URL")
                    .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
                openrouter_api_key: std::env::var("OPENROUTER_API_KEY").ok(),
                chat_model: std::env::var("AGENTDECK_CHAT_MODEL")
                    .unwrap_or_else(|_| "openai/gpt-3.5-turbo".to_string()),
            },
            runtime: RuntimeConfig::default(),
        }
    }
}
