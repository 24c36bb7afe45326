//! Console configuration
//!
//! Settings come from defaults, then an optional TOML file, then `CRUD_CONSOLE_*`
//! environment variables. [`ConfigBuilder`] assembles a config in code.

pub mod repository;

use anyhow::{Context, Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::constants::{DEFAULT_REFRESH_THRESHOLD_SECS, SUGGESTION_LIMIT};
use crate::controller::DEFAULT_ROW_LIMIT;

pub const APP_DIR: &str = "crud-console";
pub const CONFIG_FILE: &str = "config.toml";
pub const STATE_DB_FILE: &str = "state.db";

pub const ENV_API_URL: &str = "CRUD_CONSOLE_API_URL";
pub const ENV_USER_URL: &str = "CRUD_CONSOLE_USER_URL";
pub const ENV_REFRESH_THRESHOLD_SECS: &str = "CRUD_CONSOLE_REFRESH_THRESHOLD_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the query and mutation endpoints
    pub api_url: String,
    /// Base URL of the login and refresh endpoints
    pub user_url: String,
    /// Seconds after which the access token is refreshed; keep it below the token lifetime
    pub refresh_threshold_secs: u64,
    pub row_limit: u64,
    pub suggestion_limit: u64,
    pub log_level: String,
    /// sqlite file holding the session and saved tabs
    pub state_db: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".to_string(),
            user_url: "http://localhost:8080/user".to_string(),
            refresh_threshold_secs: DEFAULT_REFRESH_THRESHOLD_SECS,
            row_limit: DEFAULT_ROW_LIMIT,
            suggestion_limit: SUGGESTION_LIMIT,
            log_level: "info".to_string(),
            state_db: default_state_db(),
        }
    }
}

fn default_state_db() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(STATE_DB_FILE)
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// `<config dir>/crud-console/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when it exists, then apply the
    /// environment. A missing explicit file is an error; a missing default one is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Apply `CRUD_CONSOLE_*` overrides looked up through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(url) = lookup(ENV_USER_URL) {
            self.user_url = url;
        }
        if let Some(secs) = lookup(ENV_REFRESH_THRESHOLD_SECS) {
            self.refresh_threshold_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of seconds", ENV_REFRESH_THRESHOLD_SECS))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() || self.user_url.trim().is_empty() {
            bail!("api_url and user_url must be set");
        }
        if self.refresh_threshold_secs == 0 {
            bail!("refresh_threshold_secs must be greater than zero");
        }
        if self.row_limit == 0 || self.suggestion_limit == 0 {
            bail!("row_limit and suggestion_limit must be greater than zero");
        }
        Ok(())
    }
}

/// Builder over [`Config::default`]
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn user_url(mut self, url: impl Into<String>) -> Self {
        self.config.user_url = url.into();
        self
    }

    pub fn refresh_threshold_secs(mut self, secs: u64) -> Self {
        self.config.refresh_threshold_secs = secs;
        self
    }

    pub fn row_limit(mut self, limit: u64) -> Self {
        self.config.row_limit = limit;
        self
    }

    pub fn suggestion_limit(mut self, limit: u64) -> Self {
        self.config.suggestion_limit = limit;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    pub fn state_db(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.state_db = path.into();
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
