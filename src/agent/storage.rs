/// SQLite persistence for agent records
///
/// Agents are stored as JSON for flexibility while keeping indexed lookup
/// fields for listing. A fresh table is seeded with the default roster so the
/// dashboard has something to show on first boot.

use crate::agent::types::{default_agents, Agent};
use anyhow::Result;
use sqlx::{sqlite::SqlitePool, Row};

/// SQLite-based agent record store
#[derive(Debug, Clone)]
pub struct AgentStore {
    /// Shared record store connection pool
    pool: SqlitePool,
}

impl AgentStore {
    /// Create new store instance over the shared pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Seed the default agent roster if the table is empty
    ///
    /// Called once during startup. Existing records are never overwritten.
    pub async fn seed_defaults(&self) -> Result<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agents")
            .fetch_one(&self.pool)
            .await?;

        if count > 0 {
            return Ok(());
        }

        for agent in default_agents() {
            self.save_agent(&agent).await?;
        }
        tracing::info!("🌱 Seeded default agent roster");

        Ok(())
    }

    /// Store a new agent or update an existing one
    pub async fn save_agent(&self, agent: &Agent) -> Result<()> {
        let record_json = serde_json::to_string(agent)?;

        sqlx::query(
            r#"
            INSERT INTO agents (id, name, record, updated_at)
            VALUES (?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                record = excluded.record,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&agent.id)
        .bind(&agent.name)
        .bind(&record_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update an existing agent in place; returns false when the record is gone
    ///
    /// Never inserts, unlike save_agent. A concurrent delete wins over an
    /// in-flight write holding a stale copy of the record.
    pub async fn update_agent(&self, agent: &Agent) -> Result<bool> {
        let record_json = serde_json::to_string(agent)?;

        let result = sqlx::query(
            "UPDATE agents SET name = ?, record = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(&agent.name)
        .bind(&record_json)
        .bind(&agent.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Retrieve an agent by ID
    pub async fn get_agent(&self, id: &str) -> Result<Option<Agent>> {
        let row = sqlx::query("SELECT record FROM agents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let record_json: String = row.get("record");
                let agent: Agent = serde_json::from_str(&record_json)?;
                Ok(Some(agent))
            }
            None => Ok(None),
        }
    }

    /// List all agents in creation order
    pub async fn list_agents(&self) -> Result<Vec<Agent>> {
        let rows = sqlx::query("SELECT record FROM agents ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut agents = Vec::new();
        for row in rows {
            let record_json: String = row.get("record");
            agents.push(serde_json::from_str(&record_json)?);
        }

        Ok(agents)
    }

    /// Delete an agent by ID; returns false when the record did not exist
    pub async fn delete_agent(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
