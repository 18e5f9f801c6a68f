/// Hot-reload workflow registry using ArcSwap
///
/// Provides lock-free, atomic updates to the in-memory workflow registry.
/// Every store mutation swaps the entire registry pointer, so sibling
/// readers (the runtime, the API) immediately observe the new state without
/// blocking in-flight runs. This is the server-side analog of the
/// dashboard's storage-change notification event.

use crate::workflow::{storage::WorkflowStore, types::Workflow};
use anyhow::Result;
use arc_swap::ArcSwap;
use std::{collections::HashMap, sync::Arc};

/// Lock-free workflow registry for hot-reload capabilities
#[derive(Debug)]
pub struct WorkflowRegistry {
    /// Thread-safe atomic pointer to workflow map
    /// Key: workflow_id, Value: compiled workflow definition
    workflows: ArcSwap<HashMap<String, CompiledWorkflow>>,

    /// Reference to persistent storage for reload operations
    storage: WorkflowStore,
}

/// Compiled workflow with execution metadata
///
/// Extends the base Workflow with the trigger entry points the runtime
/// starts a simulated run from. A workflow with no triggers still compiles;
/// the runtime rejects it at execute time, matching how the dashboard only
/// complained when the run button was pressed.
#[derive(Debug, Clone)]
pub struct CompiledWorkflow {
    /// Base workflow definition
    pub workflow: Workflow,

    /// Node IDs of trigger nodes, the valid run entry points
    pub start_node_ids: Vec<String>,
}

impl WorkflowRegistry {
    /// Create new registry instance with storage backend
    pub fn new(storage: WorkflowStore) -> Self {
        Self {
            workflows: ArcSwap::new(Arc::new(HashMap::new())),
            storage,
        }
    }

    /// Initialize registry by loading all workflows from storage
    ///
    /// Called during application startup to populate the in-memory registry.
    pub async fn init_from_storage(&self) -> Result<()> {
        let stored_workflows = self.storage.load_all_workflows().await?;
        let compiled: HashMap<String, CompiledWorkflow> = stored_workflows
            .into_iter()
            .map(|(id, workflow)| (id, compile_workflow(workflow)))
            .collect();

        // Atomic swap of the entire registry
        self.workflows.store(Arc::new(compiled));

        tracing::info!(
            "Initialized workflow registry with {} workflows",
            self.workflows.load().len()
        );

        Ok(())
    }

    /// Hot-reload a single workflow from storage
    ///
    /// Updates or adds a workflow to the registry using atomic pointer swap.
    /// This operation is lock-free and doesn't block concurrent runs.
    pub async fn reload_workflow(&self, workflow_id: &str) -> Result<()> {
        let workflow = self
            .storage
            .get_workflow(workflow_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Workflow not found: {}", workflow_id))?;

        let compiled = compile_workflow(workflow);

        // Clone current registry and update it
        let current = self.workflows.load();
        let mut new_registry = (**current).clone();
        new_registry.insert(workflow_id.to_string(), compiled);

        // Atomic swap to new registry
        self.workflows.store(Arc::new(new_registry));

        tracing::debug!("Hot-reloaded workflow: {}", workflow_id);

        Ok(())
    }

    /// Get a workflow by ID (lock-free read)
    pub fn get_workflow(&self, workflow_id: &str) -> Option<CompiledWorkflow> {
        self.workflows.load().get(workflow_id).cloned()
    }

    /// List all active workflow IDs
    pub fn list_workflow_ids(&self) -> Vec<String> {
        self.workflows.load().keys().cloned().collect()
    }

    /// Remove a workflow from registry
    pub fn remove_workflow(&self, workflow_id: &str) {
        let current = self.workflows.load();
        let mut new_registry = (**current).clone();

        if new_registry.remove(workflow_id).is_some() {
            self.workflows.store(Arc::new(new_registry));
            tracing::info!("Removed workflow from registry: {}", workflow_id);
        }
    }
}

/// Compile a workflow into execution-ready form
///
/// Extracts the trigger node IDs used as run entry points. No structural
/// validation happens here; graph checks (unknown connection endpoints,
/// cycles) are the runtime's job.
fn compile_workflow(workflow: Workflow) -> CompiledWorkflow {
    let start_node_ids = workflow.trigger_node_ids();
    CompiledWorkflow {
        workflow,
        start_node_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_extracts_trigger_entry_points() {
        let workflow: Workflow = serde_json::from_value(serde_json::json!({
            "id": "wf", "name": "W",
            "nodes": [
                { "id": "start", "name": "Start", "type": "trigger" },
                { "id": "work", "name": "Work", "type": "agent" }
            ],
            "connections": [ { "from": "start", "to": "work" } ]
        }))
        .unwrap();

        let compiled = compile_workflow(workflow);
        assert_eq!(compiled.start_node_ids, vec!["start"]);
    }

    #[test]
    fn trigger_less_workflow_still_compiles() {
        let workflow: Workflow = serde_json::from_value(serde_json::json!({
            "id": "wf", "name": "W",
            "nodes": [ { "id": "work", "name": "Work", "type": "agent" } ]
        }))
        .unwrap();

        let compiled = compile_workflow(workflow);
        assert!(compiled.start_node_ids.is_empty());
    }
}
