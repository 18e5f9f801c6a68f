/// Core workflow type definitions
///
/// Defines the workflow, node, and connection records the dashboard persists.
/// Records serialize camelCase because that is the wire shape the UI reads
/// and writes; they round-trip through the SQLite JSON columns unchanged.

use serde::{Deserialize, Serialize};

/// A complete workflow definition containing nodes and their connections
///
/// Workflows are stored as JSON in SQLite and compiled into dependency
/// graphs for simulated execution. Node statuses are part of the record so
/// readers observe execution progress between polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Unique workflow identifier (e.g., "invoice-pipeline")
    pub id: String,
    /// Human-readable workflow name
    pub name: String,
    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether a simulated run is in flight
    #[serde(default)]
    pub status: WorkflowStatus,
    /// When true, a finished run resets and replays exactly once more
    #[serde(default)]
    pub is_looping: bool,
    /// Nodes in this workflow
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Directed connections between nodes
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Workflow lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// A simulated run is in flight
    Running,
    /// No run in flight (also the terminal state after success or failure)
    #[default]
    Paused,
}

/// A single node in the workflow graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique node identifier within the workflow
    pub id: String,
    /// Human-readable node name
    pub name: String,
    /// Node category; decides the simulated pace during execution
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Per-run execution state, persisted as the run progresses
    #[serde(default)]
    pub status: NodeRunState,
    /// Description of what the node is "doing" while running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task: Option<String>,
}

/// Node categories understood by the simulated executor
///
/// Unrecognized categories deserialize as Custom and run with the default
/// pace, so the store never rejects a record over a node type it has not
/// seen before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Run entry point; every executable workflow needs at least one
    Trigger,
    /// Simulated agent work step
    Agent,
    /// Simulated outbound notification step
    Notifier,
    /// Anything else
    #[serde(other)]
    Custom,
}

/// Per-run execution state of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRunState {
    #[default]
    Idle,
    Running,
    Completed,
}

/// Directed connection between two nodes
///
/// The runtime uses these to build the dependency graph: a node runs only
/// after every node connecting into it has completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Source node ID
    pub from: String,
    /// Target node ID
    pub to: String,
}

impl Workflow {
    /// Reset all node run state back to idle (used before a looped replay)
    pub fn reset_node_states(&mut self) {
        for node in &mut self.nodes {
            node.status = NodeRunState::Idle;
        }
    }

    /// IDs of all trigger nodes, the valid run entry points
    pub fn trigger_node_ids(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Trigger)
            .map(|n| n.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_round_trips_camel_case() {
        let json = serde_json::json!({
            "id": "wf-1",
            "name": "Pipeline",
            "isLooping": true,
            "nodes": [
                { "id": "n1", "name": "Start", "type": "trigger" },
                { "id": "n2", "name": "Work", "type": "agent", "currentTask": "Processing..." }
            ],
            "connections": [ { "from": "n1", "to": "n2" } ]
        });

        let workflow: Workflow = serde_json::from_value(json).unwrap();
        assert!(workflow.is_looping);
        assert_eq!(workflow.status, WorkflowStatus::Paused);
        assert_eq!(workflow.nodes[0].node_type, NodeType::Trigger);
        assert_eq!(workflow.nodes[1].status, NodeRunState::Idle);

        let back = serde_json::to_value(&workflow).unwrap();
        assert_eq!(back["isLooping"], true);
        assert_eq!(back["nodes"][1]["type"], "agent");
        assert_eq!(back["nodes"][1]["currentTask"], "Processing...");
    }

    #[test]
    fn unknown_node_type_becomes_custom() {
        let node: Node = serde_json::from_value(serde_json::json!({
            "id": "n9", "name": "Webhook", "type": "webhook"
        }))
        .unwrap();
        assert_eq!(node.node_type, NodeType::Custom);
    }

    #[test]
    fn trigger_node_ids_filters_by_type() {
        let workflow: Workflow = serde_json::from_value(serde_json::json!({
            "id": "wf", "name": "W",
            "nodes": [
                { "id": "a", "name": "A", "type": "trigger" },
                { "id": "b", "name": "B", "type": "agent" },
                { "id": "c", "name": "C", "type": "trigger" }
            ]
        }))
        .unwrap();
        assert_eq!(workflow.trigger_node_ids(), vec!["a", "c"]);
    }
}
