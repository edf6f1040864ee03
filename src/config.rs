//! Client Square configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CLIENT_SQUARE_DATA` - Path of the JSON data file (default: data/clientsquare.json)
//! - `CLIENT_SQUARE_LOG` - Log filter directive (default: info)

use std::path::PathBuf;

use thiserror::Error;

pub const DATA_FILE_VAR: &str = "CLIENT_SQUARE_DATA";
pub const LOG_FILTER_VAR: &str = "CLIENT_SQUARE_LOG";

const DEFAULT_DATA_FILE: &str = "data/clientsquare.json";
const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON file holding clients and appointments
    pub data_file: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_file = lookup(DATA_FILE_VAR).unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
        if data_file.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                DATA_FILE_VAR.to_string(),
                "path must not be empty".to_string(),
            ));
        }

        let log_filter = lookup(LOG_FILTER_VAR)
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Config {
            data_file: PathBuf::from(data_file),
            log_filter,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
