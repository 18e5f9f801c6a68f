/// Simulated node execution
///
/// Each node type maps to a fixed pause length; "executing" a node is
/// sleeping that long. The pace table comes from configuration so tests can
/// run workflows at full speed.

use crate::config::RuntimeConfig;
use crate::workflow::types::{Node, NodeType};
use anyhow::Result;
use std::time::Duration;

/// Node executor with a per-type simulated pace
#[derive(Debug)]
pub struct NodeExecutor {
    trigger_pace: Duration,
    agent_pace: Duration,
    notifier_pace: Duration,
    custom_pace: Duration,
}

impl NodeExecutor {
    /// Create an executor from the configured pace table
    pub fn new(runtime: &RuntimeConfig) -> Self {
        Self {
            trigger_pace: Duration::from_millis(runtime.trigger_pace_ms),
            agent_pace: Duration::from_millis(runtime.agent_pace_ms),
            notifier_pace: Duration::from_millis(runtime.notifier_pace_ms),
            custom_pace: Duration::from_millis(runtime.custom_pace_ms),
        }
    }

    /// Simulated pause length for a node type
    pub fn pace_for(&self, node_type: NodeType) -> Duration {
        match node_type {
            NodeType::Trigger => self.trigger_pace,
            NodeType::Agent => self.agent_pace,
            NodeType::Notifier => self.notifier_pace,
            NodeType::Custom => self.custom_pace,
        }
    }

    /// "Execute" a single node by sleeping its simulated pace
    pub async fn execute_node(&self, node: &Node) -> Result<()> {
        let pace = self.pace_for(node.node_type);
        tracing::info!(
            "📍 Executing node '{}' ({:?}) for {:?}",
            node.name,
            node.node_type,
            pace
        );

        if node.node_type == NodeType::Notifier {
            // The dashboard raised an alert dialog here; server side it is a log line
            tracing::info!("🔔 Notification from {}: Task completed", node.name);
        }

        tokio::time::sleep(pace).await;

        tracing::info!("✅ Completed node '{}'", node.name);
        Ok(())
    }
}
