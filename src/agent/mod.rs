/// Agent record layer - types, persistence, and simulated metrics
///
/// Agents are dashboard records, not running processes. Their CPU/memory and
/// task counters are maintained by a background simulator.

pub mod monitor;
pub mod storage;
pub mod types;

pub use monitor::MetricsSimulator;
pub use storage::AgentStore;
pub use types::{Agent, AgentStatus};
