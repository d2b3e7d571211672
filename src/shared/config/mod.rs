//! Synchronization configuration module
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! hub_capacity = 512
//! echo_policy = "origin"
//! pending_ttl_secs = 120
//!
//! [retry]
//! strategy = "exponential"
//! max_attempts = 4
//! base_delay_ms = 100
//! max_delay_ms = 2000
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// How a screen recognises its own events when they come back from the hub
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EchoPolicy {
    /// Skip envelopes whose origin is this screen
    #[default]
    Origin,
    /// One-shot flag: drop the first event received after any broadcast
    LegacyFlag,
}

/// Delay growth between confirmation attempts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    Fixed,
    #[default]
    Exponential,
}

/// Retry settings for backend confirmation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryConfig {
    pub strategy: BackoffKind,
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            strategy: BackoffKind::Exponential,
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 5_000,
        }
    }
}

/// Content synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    /// Buffered envelopes per subscriber before it lags
    pub hub_capacity: usize,
    pub echo_policy: EchoPolicy,
    pub retry: RetryConfig,
    /// Age after which an unsettled optimistic action is forgotten
    pub pending_ttl_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            hub_capacity: 256,
            echo_policy: EchoPolicy::Origin,
            retry: RetryConfig::default(),
            pending_ttl_secs: 300,
        }
    }
}

impl SyncConfig {
    /// Create a new SyncConfigBuilder
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `<config_dir>/medfeed/sync.toml`, or defaults when it does not exist
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!("[Config] Loading {}", path.display());
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Platform location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("medfeed").join("sync.toml"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hub_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "hub_capacity",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "retry.max_attempts",
                message: "must be at least 1".to_string(),
            });
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::Invalid {
                field: "retry.base_delay_ms",
                message: format!(
                    "{} exceeds max_delay_ms {}",
                    self.retry.base_delay_ms, self.retry.max_delay_ms
                ),
            });
        }
        Ok(())
    }

    pub fn pending_ttl(&self) -> Duration {
        Duration::from_secs(self.pending_ttl_secs)
    }
}

/// Builder for SyncConfig
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    pub fn hub_capacity(mut self, capacity: usize) -> Self {
        self.config.hub_capacity = capacity;
        self
    }

    pub fn echo_policy(mut self, policy: EchoPolicy) -> Self {
        self.config.echo_policy = policy;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn pending_ttl_secs(mut self, secs: u64) -> Self {
        self.config.pending_ttl_secs = secs;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<SyncConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("invalid TOML: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}
