/// Agentdeck server entry point
///
/// Initializes configuration from the environment and starts the HTTP
/// server with record management, simulated execution, and the chat relay.

use agentdeck::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Chat relay at /api/adk-chat and /api/chat
/// - Record management at /api/agents, /api/workflows, /api/settings
/// - Simulated run controls at /api/workflows/{id}/execute and /stop
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (env vars with localhost-friendly defaults)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
