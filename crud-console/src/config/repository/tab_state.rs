//! Saved tabs, keyed by tab id

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::view::TabSnapshot;

/// Store or replace the snapshot of a tab
pub async fn save_tab_state(pool: &SqlitePool, tab_id: &str, snapshot: &TabSnapshot) -> Result<()> {
    let serialized = snapshot.to_json().context("Failed to serialize tab state")?;

    sqlx::query(
        "INSERT INTO tab_state (tab_id, entity, snapshot, updated_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(tab_id) DO UPDATE SET
            entity = excluded.entity,
            snapshot = excluded.snapshot,
            updated_at = excluded.updated_at",
    )
    .bind(tab_id)
    .bind(&snapshot.entity)
    .bind(serialized)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(pool)
    .await
    .context("Failed to save tab state")?;

    Ok(())
}

/// Snapshot of a tab, `None` when nothing was saved
pub async fn load_tab_state(pool: &SqlitePool, tab_id: &str) -> Result<Option<TabSnapshot>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT snapshot FROM tab_state WHERE tab_id = ?")
        .bind(tab_id)
        .fetch_optional(pool)
        .await
        .context("Failed to load tab state")?;

    row.map(|(serialized,)| {
        TabSnapshot::from_json(&serialized)
            .with_context(|| format!("Corrupt tab state for {}", tab_id))
    })
    .transpose()
}

pub async fn delete_tab_state(pool: &SqlitePool, tab_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM tab_state WHERE tab_id = ?")
        .bind(tab_id)
        .execute(pool)
        .await
        .context("Failed to delete tab state")?;

    Ok(())
}

/// (tab id, entity) of every saved tab
pub async fn list_tabs(pool: &SqlitePool) -> Result<Vec<(String, String)>> {
    sqlx::query_as("SELECT tab_id, entity FROM tab_state ORDER BY tab_id")
        .fetch_all(pool)
        .await
        .context("Failed to list tabs")
}
