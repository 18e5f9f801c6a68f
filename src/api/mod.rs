/// HTTP API layer - REST endpoints for records, runs, and the chat relay
///
/// All routers share one application state: the record stores, the hot
/// workflow registry, the simulated runtime, and the relay clients.

pub mod agents;
pub mod chat;
pub mod settings;
pub mod workflows;

use crate::agent::AgentStore;
use crate::relay::{AdkClient, OpenRouterClient};
use crate::runtime::{ExecutionEngine, RunController};
use crate::settings::SettingsStore;
use crate::workflow::{WorkflowRegistry, WorkflowStore};
use std::sync::Arc;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Agent record store
    pub agents: AgentStore,
    /// Workflow record store
    pub workflows: WorkflowStore,
    /// Settings record store
    pub settings: SettingsStore,
    /// Hot-reload registry of compiled workflows
    pub registry: Arc<WorkflowRegistry>,
    /// Simulated execution engine
    pub engine: Arc<ExecutionEngine>,
    /// Single-run guard
    pub controller: Arc<RunController>,
    /// ADK relay upstream client
    pub adk: AdkClient,
    /// Completions relay upstream client
    pub openrouter: OpenRouterClient,
}
