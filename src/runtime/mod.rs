/// Simulated workflow runtime
///
/// Walks a workflow's dependency graph and pauses a fixed duration per node
/// type instead of doing real work. One run is active at a time, guarded by
/// a shared cancellation flag checked between nodes.

pub mod controller;
pub mod engine;
pub mod executor;

pub use controller::{RunController, RunToken};
pub use engine::{ExecutionEngine, ExecutionPlan, RunOutcome};
pub use executor::NodeExecutor;
