//! Configuration for the Radzi client core
//!
//! Layering: built-in defaults, then an optional TOML file, then `RADZI_*`
//! environment variables, then validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::RadziError;

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout_ms: u64,
    /// Static bearer token, for development hosts
    pub bearer_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.radzi.app/v1".to_string(),
            timeout_ms: 10_000,
            bearer_token: None,
        }
    }
}

/// Device storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the filesystem storage handler
    pub base_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./radzi-data"),
        }
    }
}

/// Query cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction
    pub capacity: usize,
    /// Staleness window of the bounding-box feedback query
    pub feedback_stale_after_secs: u64,
    /// Staleness window of both road-section queries
    pub road_sections_stale_after_secs: u64,
    /// Staleness window of the share-code club lookup
    pub clubs_stale_after_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            feedback_stale_after_secs: 120,
            road_sections_stale_after_secs: 300,
            clubs_stale_after_secs: 300,
        }
    }
}

impl CacheConfig {
    /// Feedback window as a `Duration`.
    pub fn feedback_stale_after(&self) -> Duration {
        Duration::from_secs(self.feedback_stale_after_secs)
    }

    /// Road-section window as a `Duration`.
    pub fn road_sections_stale_after(&self) -> Duration {
        Duration::from_secs(self.road_sections_stale_after_secs)
    }

    /// Club lookup window as a `Duration`.
    pub fn clubs_stale_after(&self) -> Duration {
        Duration::from_secs(self.clubs_stale_after_secs)
    }
}

/// Startup bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Minimum time the splash stays up
    pub min_delay_ms: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self { min_delay_ms: 2000 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadziConfig {
    /// Remote API
    pub api: ApiConfig,
    /// Device storage
    pub storage: StorageConfig,
    /// Query cache
    pub cache: CacheConfig,
    /// Startup bootstrap
    pub bootstrap: BootstrapConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl RadziConfig {
    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, RadziError> {
        toml::from_str(content).map_err(|e| RadziError::config(format!("Invalid TOML: {e}")))
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, RadziError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RadziError::config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `RADZI_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<(), RadziError> {
        self.merge_env_vars(std::env::vars())
    }

    /// Apply `RADZI_*` overrides from an explicit variable list.
    pub fn merge_env_vars<I>(&mut self, vars: I) -> Result<(), RadziError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix("RADZI_") else {
                continue;
            };
            match name {
                "API_BASE_URL" => self.api.base_url = value,
                "API_TIMEOUT_MS" => self.api.timeout_ms = parse_number(&key, &value)?,
                "API_BEARER_TOKEN" => self.api.bearer_token = Some(value),
                "STORAGE_PATH" => self.storage.base_path = PathBuf::from(value),
                "CACHE_CAPACITY" => self.cache.capacity = parse_number(&key, &value)?,
                "BOOTSTRAP_MIN_DELAY_MS" => {
                    self.bootstrap.min_delay_ms = parse_number(&key, &value)?;
                }
                "LOG_LEVEL" => self.logging.level = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Check invariants the rest of the core relies on.
    pub fn validate(&self) -> Result<(), RadziError> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(RadziError::config("api.base_url must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RadziError::config(format!(
                "api.base_url must be http(s): {url}"
            )));
        }
        if self.api.timeout_ms == 0 {
            return Err(RadziError::config("api.timeout_ms must be positive"));
        }
        if self.cache.capacity == 0 {
            return Err(RadziError::config("cache.capacity must be positive"));
        }
        if self.cache.feedback_stale_after_secs == 0
            || self.cache.road_sections_stale_after_secs == 0
            || self.cache.clubs_stale_after_secs == 0
        {
            return Err(RadziError::config("cache staleness windows must be positive"));
        }
        Ok(())
    }

    /// Defaults, then optional file, then environment, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, RadziError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, RadziError> {
    value
        .trim()
        .parse()
        .map_err(|_| RadziError::config(format!("{key} must be a number, got {value:?}")))
}
