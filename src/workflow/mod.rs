/// Workflow management layer - definitions, storage, and hot registry
///
/// Workflows are dashboard records: a node list plus directed connections,
/// "executed" by the simulated runtime. This module owns their types, SQLite
/// persistence, and the lock-free in-memory registry.

pub mod csv;
pub mod registry;
pub mod storage;
pub mod types;

pub use registry::{CompiledWorkflow, WorkflowRegistry};
pub use storage::{WorkflowMetadata, WorkflowStore};
pub use types::{Connection, Node, NodeRunState, NodeType, Workflow, WorkflowStatus};
