/// SQLite persistence for the settings record
///
/// Each settings section is stored as its own JSON row so a section can be
/// replaced without rewriting the others. Missing sections fall back to
/// defaults on read.

use crate::settings::types::Settings;
use anyhow::Result;
use serde_json::Value;
use sqlx::{sqlite::SqlitePool, Row};

/// SQLite-based settings store
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// Shared record store connection pool
    pool: SqlitePool,
}

impl SettingsStore {
    /// Create new store instance over the shared pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load the full settings record, defaulting any missing section
    pub async fn get_settings(&self) -> Result<Settings> {
        let rows = sqlx::query("SELECT section, record FROM settings")
            .fetch_all(&self.pool)
            .await?;

        let mut merged = serde_json::to_value(Settings::default())?;
        for row in rows {
            let section: String = row.get("section");
            let record_json: String = row.get("record");
            let record: Value = serde_json::from_str(&record_json)?;
            merged[section.as_str()] = record;
        }

        let settings: Settings = serde_json::from_value(merged)?;
        Ok(settings)
    }

    /// Replace the full settings record
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let record = serde_json::to_value(settings)?;
        let sections = record
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("Settings record must be a JSON object"))?;

        for (section, value) in sections {
            sqlx::query(
                r#"
                INSERT INTO settings (section, record, updated_at)
                VALUES (?, ?, CURRENT_TIMESTAMP)
                ON CONFLICT(section) DO UPDATE SET
                    record = excluded.record,
                    updated_at = CURRENT_TIMESTAMP
                "#,
            )
            .bind(section)
            .bind(serde_json::to_string(value)?)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}
