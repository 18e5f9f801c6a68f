/// Simulated agent metrics
///
/// A background task that periodically nudges every agent's CPU, memory, and
/// task counters with bounded random jitter, the same way the dashboard's
/// interval timer did. Values stay inside the display ranges the UI expects.

use crate::agent::storage::AgentStore;
use crate::agent::types::Agent;
use anyhow::Result;
use rand::Rng;
use std::time::Duration;

/// Background metric simulator for agent records
#[derive(Debug, Clone)]
pub struct MetricsSimulator {
    /// Agent record store to read and write
    store: AgentStore,
    /// Pause between simulation passes
    interval: Duration,
}

impl MetricsSimulator {
    /// Create a new simulator over the given store
    pub fn new(store: AgentStore, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run the simulation loop forever
    ///
    /// Spawned as a background task during server startup. Errors in a pass
    /// are logged and the loop continues; a broken store read should not
    /// take the simulator down.
    pub async fn run(self) {
        tracing::info!("📈 Agent metrics simulator started (every {:?})", self.interval);
        loop {
            tokio::time::sleep(self.interval).await;
            if let Err(e) = self.tick().await {
                tracing::error!("Metrics simulation pass failed: {}", e);
            }
        }
    }

    /// Apply one jitter pass to every agent record
    ///
    /// Writes are update-only: an agent deleted between the list and the
    /// write stays deleted. The pass touches metrics fields only, so
    /// lastActivity keeps pointing at the last real record mutation.
    pub async fn tick(&self) -> Result<()> {
        let mut agents = self.store.list_agents().await?;

        for agent in &mut agents {
            jitter_agent(agent);
            if !self.store.update_agent(agent).await? {
                tracing::debug!("Agent '{}' removed mid-pass, skipping", agent.id);
            }
        }

        tracing::debug!("Updated simulated metrics for {} agents", agents.len());
        Ok(())
    }
}

/// Nudge one agent's simulated metrics in place
///
/// Same arithmetic as the dashboard interval: up to +2 tasks per pass, CPU
/// drift within ±5 points clamped to 10..=90, memory drift within ±4 points
/// clamped to 10..=80.
fn jitter_agent(agent: &mut Agent) {
    let mut rng = rand::thread_rng();
    agent.tasks_completed += rng.gen_range(0..3);
    agent.cpu = (agent.cpu + (rng.gen::<f64>() - 0.5) * 10.0).clamp(10.0, 90.0);
    agent.memory = (agent.memory + (rng.gen::<f64>() - 0.5) * 8.0).clamp(10.0, 80.0);
}
