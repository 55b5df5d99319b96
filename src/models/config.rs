//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ArticleStatus;

/// Environment variable that overrides `api.base_url`.
pub const API_BASE_ENV: &str = "NEWSROOM_API_BASE";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// REST API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Credential persistence
    #[serde(default)]
    pub session: SessionConfig,

    /// Article listing behavior
    #[serde(default)]
    pub listing: ListingConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
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

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_api_base(std::env::var(API_BASE_ENV).ok());
    }

    fn apply_api_base(&mut self, value: Option<String>) {
        if let Some(base) = value.filter(|v| !v.trim().is_empty()) {
            log::debug!("{} overrides api.base_url with {}", API_BASE_ENV, base);
            self.api.base_url = base.trim().to_string();
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::validation("api.base_url is empty"));
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| AppError::validation(format!("api.base_url is not a URL: {e}")))?;
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.listing.page_size == 0 {
            return Err(AppError::validation("listing.page_size must be > 0"));
        }
        Ok(())
    }
}

/// REST API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the API paths are appended to
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Base URL for relative media asset URLs (empty keeps them relative)
    #[serde(default)]
    pub asset_base_url: String,

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
            asset_base_url: String::new(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Credential persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the bearer token; empty keeps it in memory only
    #[serde(default)]
    pub token_file: String,
}

impl SessionConfig {
    /// Token file path, if persistence is enabled.
    pub fn token_path(&self) -> Option<PathBuf> {
        let trimmed = self.token_file.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

/// How an inverted date range (`date_from > date_to`) is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangePolicy {
    /// Send the range to the server unchanged
    #[default]
    PassThrough,
    /// Refuse the filter change with a validation error
    Reject,
}

/// Article listing behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Articles per page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Quiet period before a search input is committed
    #[serde(default = "defaults::search_debounce")]
    pub search_debounce_ms: u64,

    /// Inverted date range handling
    #[serde(default)]
    pub date_range: DateRangePolicy,

    /// Status filter applied by public listings
    #[serde(default = "defaults::default_status")]
    pub default_status: Option<ArticleStatus>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
            search_debounce_ms: defaults::search_debounce(),
            date_range: DateRangePolicy::default(),
            default_status: defaults::default_status(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use crate::models::ArticleStatus;

    // Api defaults
    pub fn base_url() -> String {
        "http://127.0.0.1:8000".into()
    }
    pub fn user_agent() -> String {
        concat!("newsroom/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Listing defaults
    pub fn page_size() -> u32 {
        8
    }
    pub fn search_debounce() -> u64 {
        500
    }
    pub fn default_status() -> Option<ArticleStatus> {
        Some(ArticleStatus::Published)
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
