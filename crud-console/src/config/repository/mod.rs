//! Repository layer for the local state database

pub mod session;
pub mod tab_state;

pub use session::SqliteSessionStore;

use anyhow::{Context, Result};
use log::debug;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS session (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        access_token TEXT,
        refresh_token TEXT,
        last_refresh INTEGER
    )",
    "CREATE TABLE IF NOT EXISTS tab_state (
        tab_id TEXT PRIMARY KEY,
        entity TEXT NOT NULL,
        snapshot TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
];

/// Open the state database at `path`, creating it and its tables when missing
pub async fn open(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let url = format!("sqlite://{}?mode=rwc", path.display());
    connect(&url).await
}

pub async fn connect(url: &str) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await
        .with_context(|| format!("Failed to open state database {}", url))?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to create state tables")?;
    }
    debug!("State database ready");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    connect("sqlite::memory:").await.unwrap()
}
