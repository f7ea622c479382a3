//! Run configuration.
//!
//! Server addresses, the mailbox pattern, and the batch size are fixed run
//! parameters loaded from a small JSON file; credentials are collected
//! interactively by the binary and never live here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

/// One IMAP endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub host: String,
    #[serde(default = "default_imap_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub use_tls: bool,
    /// Login name for this endpoint. When absent the binary reuses the
    /// source account's email address.
    #[serde(default)]
    pub username: Option<String>,
}

/// Fixed parameters of one migration run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub source: ServerConfig,
    pub destination: ServerConfig,
    #[serde(default = "default_pattern")]
    pub mailbox_pattern: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

fn default_imap_port() -> u16 {
    993
}

fn default_true() -> bool {
    true
}

fn default_pattern() -> String {
    "*".to_string()
}

fn default_batch_size() -> u32 {
    200
}

impl RunConfig {
    /// Loads and validates a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.host.is_empty() {
            return Err(ConfigError::Validation {
                message: "source host must not be empty".to_string(),
            });
        }
        if self.destination.host.is_empty() {
            return Err(ConfigError::Validation {
                message: "destination host must not be empty".to_string(),
            });
        }
        if !self.source.use_tls || !self.destination.use_tls {
            return Err(ConfigError::Validation {
                message: "TLS is required for both servers".to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Validation {
                message: "batchSize must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
