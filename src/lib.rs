/// Agentdeck: backend service for the multi-agent orchestration dashboard
///
/// Provides the record stores behind the dashboard's agents, workflows, and
/// settings, a simulated workflow runtime, and the chat relay endpoints that
/// forward prompts to external AI services.

// Core configuration and setup
pub mod config;

// Shared SQLite record store
pub mod store;

// Agent records and the simulated metrics task
pub mod agent;

// Workflow records, storage, and hot registry
pub mod workflow;

// Simulated execution runtime
pub mod runtime;

// Chat relay upstream clients
pub mod relay;

// Platform settings records
pub mod settings;

// HTTP API layer
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use agent::{Agent, AgentStatus};
pub use config::Config;
pub use runtime::RunOutcome;
pub use server::{create_app, start_server};
pub use workflow::{Connection, Node, NodeType, Workflow};
