//! Session persisted between console invocations

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::api::{Session, SessionStore};

/// Single-row session table behind [`SessionStore`]
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load(&self) -> Result<Session> {
        let row: Option<(Option<String>, Option<String>, Option<i64>)> = sqlx::query_as(
            "SELECT access_token, refresh_token, last_refresh FROM session WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load session")?;

        Ok(row
            .map(|(access_token, refresh_token, last_refresh)| Session {
                access_token,
                refresh_token,
                last_refresh,
            })
            .unwrap_or_default())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        sqlx::query(
            "INSERT INTO session (id, access_token, refresh_token, last_refresh)
             VALUES (1, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                last_refresh = excluded.last_refresh",
        )
        .bind(&session.access_token)
        .bind(&session.refresh_token)
        .bind(session.last_refresh)
        .execute(&self.pool)
        .await
        .context("Failed to save session")?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM session")
            .execute(&self.pool)
            .await
            .context("Failed to clear session")?;

        Ok(())
    }
}
