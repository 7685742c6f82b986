//! Runtime configuration for the searcher.
//!
//! Settings come from three layers, later ones winning:
//! 1. Built-in defaults
//! 2. An optional YAML file (`--config`)
//! 3. Command-line flags and their environment variables
//!
//! ```yaml
//! timeout_secs: 15
//! max_retries: 3
//! backoff_secs: 1.0
//! delay_secs: 1.5
//! user_agents:
//!   - "Mozilla/5.0 (X11; Linux x86_64) ..."
//! ```

use crate::scrapers::fetcher::{DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, USER_AGENTS};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Total attempts per page, including the first.
    pub max_retries: usize,
    /// Backoff unit in seconds; attempt `k` is followed by `2 * k` units.
    pub backoff_secs: f64,
    /// Pause between result pages in seconds.
    pub delay_secs: f64,
    /// Identity pool rotated across attempts.
    pub user_agents: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_secs: DEFAULT_BACKOFF_UNIT.as_secs_f64(),
            delay_secs: 1.0,
            user_agents: USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SearchConfig {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: origin.clone(),
            source,
        })?;
        let config = Self::from_yaml(&text, &origin)?;
        info!(path = %origin, "Loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::Invalid("max_retries must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        if self.user_agents.is_empty() || self.user_agents.iter().any(|ua| ua.trim().is_empty()) {
            return Err(ConfigError::Invalid("user_agents must be non-empty strings".into()));
        }
        for (name, value) in [("backoff_secs", self.backoff_secs), ("delay_secs", self.delay_secs)] {
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number of seconds, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Out-of-range values saturate; [`validate`](Self::validate) rejects them up front.
    pub fn backoff_unit(&self) -> Duration {
        seconds(self.backoff_secs)
    }

    pub fn delay(&self) -> Duration {
        seconds(self.delay_secs)
    }
}

fn seconds(value: f64) -> Duration {
    let fallback = if value > 0.0 { Duration::MAX } else { Duration::ZERO };
    Duration::try_from_secs_f64(value).unwrap_or(fallback)
}
