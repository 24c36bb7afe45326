//! Bearer token lifecycle
//!
//! Tracks the access token, the refresh token and the time of the last successful login or
//! refresh. The gateway asks [`AuthManager::refresh_due`] before each guarded call and records
//! the outcome of a refresh with [`AuthManager::record_tokens`].

use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::ApiError;
use super::models::TokenPair;

/// Ephemeral session contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Seconds since epoch of the last successful login or refresh
    pub last_refresh: Option<i64>,
}

/// Storage backend for the session
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Session>;
    async fn save(&self, session: &Session) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
}

/// Process-local session storage
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> anyhow::Result<Session> {
        Ok(self.session.read().await.clone())
    }

    async fn save(&self, session: &Session) -> anyhow::Result<()> {
        *self.session.write().await = session.clone();
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.session.write().await = Session::default();
        Ok(())
    }
}

/// Source of "now", in seconds since epoch
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Session bookkeeping for the gateway
#[derive(Clone)]
pub struct AuthManager {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    refresh_threshold_secs: u64,
}

impl AuthManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        refresh_threshold_secs: u64,
    ) -> Self {
        Self {
            store,
            clock,
            refresh_threshold_secs,
        }
    }

    pub fn refresh_threshold_secs(&self) -> u64 {
        self.refresh_threshold_secs
    }

    pub async fn session(&self) -> Result<Session, ApiError> {
        self.store
            .load()
            .await
            .map_err(|e| ApiError::Session(e.to_string()))
    }

    /// Whether the access token must be refreshed before the next guarded call.
    ///
    /// Fails with [`ApiError::NotAuthenticated`] when no login or refresh was ever recorded.
    pub async fn refresh_due(&self) -> Result<bool, ApiError> {
        let session = self.session().await?;
        let last_refresh = session.last_refresh.ok_or(ApiError::NotAuthenticated)?;

        let elapsed = self.clock.now_secs() - last_refresh;
        let due = elapsed > self.refresh_threshold_secs as i64;
        debug!(
            "Token age {}s (threshold {}s), refresh due: {}",
            elapsed, self.refresh_threshold_secs, due
        );
        Ok(due)
    }

    /// Current access token, required for every authenticated call
    pub async fn access_token(&self) -> Result<String, ApiError> {
        self.session()
            .await?
            .access_token
            .ok_or(ApiError::NotAuthenticated)
    }

    /// Stored refresh token, required by the refresh call
    pub async fn refresh_token(&self) -> Result<String, ApiError> {
        self.session()
            .await?
            .refresh_token
            .ok_or(ApiError::NotAuthenticated)
    }

    /// Persist a token pair from login or refresh and stamp the refresh time
    pub async fn record_tokens(&self, tokens: TokenPair) -> Result<(), ApiError> {
        let mut session = self.session().await?;
        session.access_token = Some(tokens.token_jwt);
        if let Some(refresh_token) = tokens.refresh_token {
            session.refresh_token = Some(refresh_token);
        }
        session.last_refresh = Some(self.clock.now_secs());

        self.store
            .save(&session)
            .await
            .map_err(|e| ApiError::Session(e.to_string()))?;
        info!("Session tokens updated");
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.store
            .clear()
            .await
            .map_err(|e| ApiError::Session(e.to_string()))?;
        info!("Session cleared");
        Ok(())
    }
}
