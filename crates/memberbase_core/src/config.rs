//! Runtime configuration.
//!
//! ```toml
//! [logging]
//! level = "info"
//! dir = "/var/log/memberbase"
//! ```
//!
//! `MEMBERBASE_LOG_LEVEL` and `MEMBERBASE_LOG_DIR` override file values.
//! File logging stays off while no directory is configured.

use crate::logging::{default_log_level, init_logging, LoggingError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const LOG_LEVEL_ENV: &str = "MEMBERBASE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "MEMBERBASE_LOG_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl CoreConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Applies `MEMBERBASE_LOG_LEVEL` / `MEMBERBASE_LOG_DIR` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(LOG_LEVEL_ENV).ok(),
            std::env::var(LOG_DIR_ENV).ok(),
        )
    }

    /// Blank override values are ignored.
    pub fn with_overrides(mut self, level: Option<String>, dir: Option<String>) -> Self {
        if let Some(level) = level.filter(|value| !value.trim().is_empty()) {
            self.logging.level = level.trim().to_string();
        }
        if let Some(dir) = dir.filter(|value| !value.trim().is_empty()) {
            self.logging.dir = Some(PathBuf::from(dir.trim()));
        }
        self
    }

    /// Starts file logging when a directory is configured.
    ///
    /// Returns `true` when logging is active after the call.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match &self.logging.dir {
            Some(dir) => {
                init_logging(&self.logging.level, dir)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
