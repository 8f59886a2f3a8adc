//! Configuration file parser for ~/.config/newsdesk/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde, though we log a warning when
//! the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the news backend.
    pub api_base_url: String,

    /// Item limit used for the first query of a session.
    pub default_limit: u32,

    /// Granularity of limit changes (the "slider" step).
    pub limit_step: u32,

    /// Upper bound for trending and topic queries.
    pub max_limit: u32,

    /// Upper bound for favorite-category queries.
    pub favorite_max_limit: u32,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Mode-to-endpoint mapping.
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            default_limit: 5,
            limit_step: 5,
            max_limit: 25,
            favorite_max_limit: 15,
            request_timeout_secs: 20,
            endpoints: Endpoints::default(),
        }
    }
}

/// Endpoint paths and parameter names of the backend REST surface.
///
/// Paths are relative to `api_base_url`. Keeping the mapping here means a
/// backend with a different route family only needs a config change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Trending and free-text topic news.
    pub news: String,
    /// Query parameter carrying the topic.
    pub topic_param: String,
    /// Topic value that selects the trending feed.
    pub trending_value: String,
    /// Favorite-category news.
    pub favorites: String,
    /// Query parameter carrying the category.
    pub category_param: String,
    /// Query parameter carrying the item limit (all news routes).
    pub limit_param: String,
    pub summarize: String,
    pub save: String,
    pub saved: String,
    pub delete: String,
    /// Query parameter carrying the article URL on delete.
    pub delete_param: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            news: "api/news".to_string(),
            topic_param: "topic".to_string(),
            trending_value: "trending".to_string(),
            favorites: "api/favorite-topics".to_string(),
            category_param: "category".to_string(),
            limit_param: "limit".to_string(),
            summarize: "api/summarize".to_string(),
            save: "api/save-article".to_string(),
            saved: "api/saved-articles".to_string(),
            delete: "api/delete-article".to_string(),
            delete_param: "url".to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "api_base_url",
        "default_limit",
        "limit_step",
        "max_limit",
        "favorite_max_limit",
        "request_timeout_secs",
        "endpoints",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Inconsistent limits → `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        tracing::info!(base_url = %config.api_base_url, "Loaded configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.limit_step == 0 {
            return Err(ConfigError::Invalid("limit_step must be positive".into()));
        }
        if self.max_limit < crate::query::MIN_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_limit must be at least {}",
                crate::query::MIN_LIMIT
            )));
        }
        if self.favorite_max_limit < crate::query::MIN_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "favorite_max_limit must be at least {}",
                crate::query::MIN_LIMIT
            )));
        }
        Ok(())
    }

    /// Per-request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Apply the `NEWSDESK_API_URL` environment override.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("NEWSDESK_API_URL") {
            if !url.trim().is_empty() {
                tracing::debug!(base_url = %url, "Using API base URL from environment");
                self.api_base_url = url;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
