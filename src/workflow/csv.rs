/// CSV import/export for workflow records
///
/// Bulk transfer uses one flat row shape: each row carries a workflow name
/// plus either a node or a connection, and rows group by name on import. The
/// same shape serves the downloadable template, import, and export, so an
/// exported file re-imports unchanged.

use crate::workflow::types::{Connection, Node, NodeRunState, NodeType, Workflow, WorkflowStatus};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Column layout shared by the template, import, and export
///
/// The visual columns (description, color, position) are accepted so canvas
/// exports import cleanly; the stored record keeps id, name, and type.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorkflowCsvRow {
    #[serde(default)]
    pub workflow_name: String,
    #[serde(default)]
    pub workflow_description: String,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub node_name: String,
    #[serde(default)]
    pub node_description: String,
    #[serde(default)]
    pub node_type: String,
    #[serde(default)]
    pub node_color: String,
    #[serde(default)]
    pub node_position_x: String,
    #[serde(default)]
    pub node_position_y: String,
    #[serde(default)]
    pub connection_from: String,
    #[serde(default)]
    pub connection_to: String,
}

/// Sample file served by the template download endpoint
pub const TEMPLATE: &str = "\
workflow_name,workflow_description,node_id,node_name,node_description,node_type,node_color,node_position_x,node_position_y,connection_from,connection_to
Sample Workflow,A sample workflow with multiple nodes,start-node,Start,Workflow trigger node,trigger,from-blue-500 to-cyan-500,100,100,,
Sample Workflow,A sample workflow with multiple nodes,process-node,Process Data,Data processing node,agent,from-purple-500 to-pink-500,300,100,start-node,process-node
Sample Workflow,A sample workflow with multiple nodes,end-node,End,Workflow completion node,notifier,from-emerald-500 to-teal-500,500,100,process-node,end-node
";

/// Parse a CSV document into workflow records
///
/// Rows group by workflow name, in first-seen order. A row contributes a
/// node when both node columns are present and a connection when both
/// connection columns are present; a single row can contribute both.
pub fn import_workflows(text: &str) -> Result<Vec<Workflow>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut imported: Vec<Workflow> = Vec::new();

    for row in reader.deserialize::<WorkflowCsvRow>() {
        let row = row.map_err(|e| anyhow!("Invalid CSV row: {}", e))?;

        let name = if row.workflow_name.is_empty() {
            format!("Imported Workflow {}", chrono::Utc::now().timestamp_millis())
        } else {
            row.workflow_name.clone()
        };

        let idx = match imported.iter().position(|w| w.name == name) {
            Some(idx) => idx,
            None => {
                let description = if row.workflow_description.is_empty() {
                    "Imported workflow".to_string()
                } else {
                    row.workflow_description.clone()
                };
                imported.push(Workflow {
                    id: import_id(&name),
                    name: name.clone(),
                    description: Some(description),
                    status: WorkflowStatus::Paused,
                    is_looping: false,
                    nodes: Vec::new(),
                    connections: Vec::new(),
                });
                imported.len() - 1
            }
        };
        let workflow = &mut imported[idx];

        if !row.node_id.is_empty() && !row.node_name.is_empty() {
            workflow.nodes.push(Node {
                id: row.node_id.clone(),
                name: row.node_name.clone(),
                node_type: parse_node_type(&row.node_type),
                status: NodeRunState::Idle,
                current_task: None,
            });
        }

        if !row.connection_from.is_empty() && !row.connection_to.is_empty() {
            workflow.connections.push(Connection {
                from: row.connection_from.clone(),
                to: row.connection_to.clone(),
            });
        }
    }

    if imported.is_empty() {
        return Err(anyhow!("CSV file is empty"));
    }

    Ok(imported)
}

/// Render workflow records as a CSV document
///
/// Emits node rows then connection rows per workflow, the inverse of the
/// import grouping.
pub fn export_workflows(workflows: &[Workflow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for workflow in workflows {
        let description = workflow.description.clone().unwrap_or_default();

        for node in &workflow.nodes {
            writer.serialize(WorkflowCsvRow {
                workflow_name: workflow.name.clone(),
                workflow_description: description.clone(),
                node_id: node.id.clone(),
                node_name: node.name.clone(),
                node_type: node_type_label(node.node_type).to_string(),
                ..Default::default()
            })?;
        }

        for connection in &workflow.connections {
            writer.serialize(WorkflowCsvRow {
                workflow_name: workflow.name.clone(),
                workflow_description: description.clone(),
                connection_from: connection.from.clone(),
                connection_to: connection.to.clone(),
                ..Default::default()
            })?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("CSV write failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// Derive a fresh record ID from an imported workflow name
fn import_id(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{}-{}", slug, &uuid::Uuid::new_v4().to_string()[..8])
}

/// Map the CSV node_type column to a node category; empty means agent
fn parse_node_type(raw: &str) -> NodeType {
    if raw.is_empty() {
        return NodeType::Agent;
    }
    serde_json::from_value(serde_json::Value::String(raw.to_lowercase()))
        .unwrap_or(NodeType::Custom)
}

fn node_type_label(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Trigger => "trigger",
        NodeType::Agent => "agent",
        NodeType::Notifier => "notifier",
        NodeType::Custom => "custom",
    }
}
