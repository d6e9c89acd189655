//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// View-model formatting settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Session persistence settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        let base = Url::parse(&self.api.base_url)
            .map_err(|e| AppError::validation(format!("api.base_url is invalid: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::validation("api.base_url must be http or https"));
        }
        if self.display.currency_symbol.trim().is_empty() {
            return Err(AppError::validation("display.currency_symbol is empty"));
        }
        if self.display.placeholder_image.trim().is_empty() {
            return Err(AppError::validation("display.placeholder_image is empty"));
        }
        if self.display.date_format.trim().is_empty() {
            return Err(AppError::validation("display.date_format is empty"));
        }
        Ok(())
    }
}

/// Backend API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all resource paths are joined onto
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Formatting rules applied when mapping records to listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Currency symbol prefixed to prices
    #[serde(default = "defaults::currency_symbol")]
    pub currency_symbol: String,

    /// Group digits the Indian way (1,00,000) instead of by thousands
    #[serde(default = "defaults::indian_grouping")]
    pub indian_grouping: bool,

    /// Image shown when a record carries none
    #[serde(default = "defaults::placeholder_image")]
    pub placeholder_image: String,

    /// chrono format string for listing dates
    #[serde(default = "defaults::date_format")]
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: defaults::currency_symbol(),
            indian_grouping: defaults::indian_grouping(),
            placeholder_image: defaults::placeholder_image(),
            date_format: defaults::date_format(),
        }
    }
}

/// Where the signed-in session is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session file, relative paths resolve against the storage directory
    #[serde(default = "defaults::session_file")]
    pub file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: defaults::session_file(),
        }
    }
}

impl SessionConfig {
    /// Resolve the session file against a storage directory.
    pub fn path_in(&self, storage_dir: &Path) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            storage_dir.join(&self.file)
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // API defaults
    pub fn base_url() -> String {
        "http://localhost:5000/api/".into()
    }
    pub fn user_agent() -> String {
        "campuscart-client/0.1".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Display defaults
    pub fn currency_symbol() -> String {
        "₹".into()
    }
    pub fn indian_grouping() -> bool {
        true
    }
    pub fn placeholder_image() -> String {
        "https://via.placeholder.com/300x200?text=No+Image".into()
    }
    pub fn date_format() -> String {
        "%d/%m/%Y".into()
    }

    // Session defaults
    pub fn session_file() -> PathBuf {
        PathBuf::from("session.json")
    }
}
