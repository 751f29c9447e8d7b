//! Console configuration (`console.toml`), with an environment override for
//! the API base URL.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::gateway::LoggingMode;

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "IMPORT_CONSOLE_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:5003";

/// Runtime settings for the console core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the import API, without trailing slash.
    pub api_base_url: String,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// Quiet period before a search/filter/sort change triggers a fetch.
    pub search_debounce_ms: u64,
    /// Lifetime of a notification entry.
    pub notification_ttl_ms: u64,
    /// Source label attached to CSV uploads unless the user changes it.
    pub default_source_label: String,
    /// How request URLs appear in logs.
    pub logging_mode: LoggingMode,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            search_debounce_ms: 300,
            notification_ttl_ms: 4500,
            default_source_label: "csv-upload".to_string(),
            logging_mode: LoggingMode::default(),
        }
    }
}

impl ConsoleConfig {
    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml_str(data: &str) -> Result<Self, AppError> {
        let cfg: ConsoleConfig =
            toml::from_str(data).map_err(|e| AppError::Config(e.to_string()))?;
        Ok(cfg.normalized())
    }

    /// Loads the config file at `path`, or defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&data)
    }

    /// Applies `IMPORT_CONSOLE_API_URL` if set and non-empty.
    pub fn apply_env(self) -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) => self.with_api_base_url(url),
            Err(_) => self,
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.trim().is_empty() {
            self.api_base_url = url;
        }
        self.normalized()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_base_url.trim().trim_end_matches('/').to_string();
        self.api_base_url = trimmed;
        self
    }
}
