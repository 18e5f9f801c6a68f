/// SQLite record store bootstrap
///
/// The dashboard's records (agents, workflows, settings) live in one SQLite
/// database under the configured data directory. Records are stored as JSON
/// columns with indexed lookup fields, so the store behaves like the
/// key-value store the UI expects while still supporting structured listing.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::path::Path;

/// Open (or create) the record store database under `data_dir`
///
/// Creates the directory and database file on first use and initializes the
/// schema. Safe to call repeatedly; schema creation uses IF NOT EXISTS.
pub async fn open_record_store(data_dir: &str) -> Result<SqlitePool> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create data directory '{}': {}", data_dir, e))?;

    let db_path = Path::new(data_dir).join("agentdeck.db");
    tracing::info!("🗄️ Opening record store: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Initialize the record store schema
///
/// One table per record family, each with a JSON record column and
/// timestamps maintained by UPSERT writes.
async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS agents (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            record JSON NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workflows (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            definition JSON NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            section TEXT PRIMARY KEY,
            record JSON NOT NULL,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_agents_name ON agents(name)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_workflows_name ON workflows(name)")
        .execute(pool)
        .await?;

    Ok(())
}
