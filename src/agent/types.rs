/// Agent record definitions
///
/// Mirrors the record shape the dashboard reads and writes: camelCase JSON
/// with simulated resource-usage fields. An Agent is a bookkeeping record,
/// not a handle to a real process.

use serde::{Deserialize, Serialize};

/// A platform agent record with simulated resource stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Stable slug identifier (e.g., "data-collector")
    pub id: String,
    /// Human-readable agent name
    pub name: String,
    /// Agent category shown in the dashboard (e.g., "Collector")
    #[serde(rename = "type")]
    pub agent_type: String,
    /// Current lifecycle status
    pub status: AgentStatus,
    /// Description of what the agent is "working on" right now
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task: Option<String>,
    /// Cumulative simulated task counter
    pub tasks_completed: u64,
    /// Simulated CPU usage percentage (clamped 10..=90 by the simulator)
    pub cpu: f64,
    /// Simulated memory usage percentage (clamped 10..=80 by the simulator)
    pub memory: f64,
    /// RFC 3339 timestamp of the last record mutation
    pub last_activity: String,
}

/// Agent lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Running,
    Idle,
    Error,
}

impl Agent {
    /// Stamp `last_activity` with the current time
    pub fn touch(&mut self) {
        self.last_activity = chrono::Utc::now().to_rfc3339();
    }
}

/// Default agent roster seeded into a fresh record store
///
/// Matches the four agents a new dashboard installation starts with.
pub fn default_agents() -> Vec<Agent> {
    let now = chrono::Utc::now().to_rfc3339();
    vec![
        Agent {
            id: "data-collector".to_string(),
            name: "Data Collector".to_string(),
            agent_type: "Collector".to_string(),
            status: AgentStatus::Running,
            current_task: Some("Processing customer data".to_string()),
            tasks_completed: 1247,
            cpu: 45.0,
            memory: 32.0,
            last_activity: now.clone(),
        },
        Agent {
            id: "document-parser".to_string(),
            name: "Document Parser".to_string(),
            agent_type: "Processor".to_string(),
            status: AgentStatus::Running,
            current_task: Some("Parsing invoice documents".to_string()),
            tasks_completed: 892,
            cpu: 78.0,
            memory: 56.0,
            last_activity: now.clone(),
        },
        Agent {
            id: "validator".to_string(),
            name: "Validator".to_string(),
            agent_type: "Validator".to_string(),
            status: AgentStatus::Idle,
            current_task: Some("Waiting for input".to_string()),
            tasks_completed: 543,
            cpu: 12.0,
            memory: 18.0,
            last_activity: now.clone(),
        },
        Agent {
            id: "notifier".to_string(),
            name: "Notifier".to_string(),
            agent_type: "Communication".to_string(),
            status: AgentStatus::Running,
            current_task: Some("Sending notifications".to_string()),
            tasks_completed: 324,
            cpu: 23.0,
            memory: 25.0,
            last_activity: now,
        },
    ]
}
