//! Everything a command needs: config, state database and a logged-in client

use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::notifier::ConsoleNotifier;
use crate::api::{ApiClient, AuthManager, ReqwestTransport, SystemClock};
use crate::config::Config;
use crate::config::repository::{self, SqliteSessionStore};
use crate::controller::{ControllerState, CoreController, Notifier};
use crate::view::{EntityView, ViewController};

pub struct AppContext {
    pub config: Config,
    pub pool: SqlitePool,
    pub client: ApiClient,
    notifier: Arc<dyn Notifier>,
}

impl AppContext {
    pub async fn open(config: Config) -> Result<Self> {
        let pool = repository::open(&config.state_db).await?;
        let auth = AuthManager::new(
            Arc::new(SqliteSessionStore::new(pool.clone())),
            Arc::new(SystemClock),
            config.refresh_threshold_secs,
        );
        let client = ApiClient::new(
            config.api_url.clone(),
            config.user_url.clone(),
            Arc::new(ReqwestTransport::new()),
            auth,
        );

        Ok(Self {
            config,
            pool,
            client,
            notifier: Arc::new(ConsoleNotifier),
        })
    }

    pub fn view_controller<E: EntityView>(&self) -> ViewController<E> {
        let core = CoreController::new(self.client.clone(), self.notifier.clone())
            .with_state(ControllerState::new(self.config.row_limit))
            .with_suggestion_limit(self.config.suggestion_limit);
        ViewController::new(core, format!("cli-{}", E::ENTITY_NAME))
    }
}
