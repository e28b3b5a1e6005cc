//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ELECTROSTORE_API_URL` - Base URL of the ElectroStore REST API
//!   (e.g., `https://api.electrostore.dev/api`)
//!
//! ## Optional
//! - `ELECTROSTORE_STATE_DIR` - Directory for the persisted store record
//!   (default: `.electrostore` in the working directory)
//! - `ELECTROSTORE_HTTP_TIMEOUT_SECS` - HTTP request timeout in seconds
//!   (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_STATE_DIR: &str = ".electrostore";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote REST API.
    pub api_base_url: Url,
    /// Directory holding the persisted store record.
    pub state_dir: PathBuf,
    /// Timeout applied to every HTTP request.
    pub http_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("ELECTROSTORE_API_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ELECTROSTORE_API_URL".to_owned(), e.to_string())
            })?;

        let state_dir =
            PathBuf::from(get_env_or_default("ELECTROSTORE_STATE_DIR", DEFAULT_STATE_DIR));

        let http_timeout_secs = get_env_or_default(
            "ELECTROSTORE_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("ELECTROSTORE_HTTP_TIMEOUT_SECS".to_owned(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            state_dir,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }

    /// Build a configuration with defaults for everything but the API URL.
    #[must_use]
    pub fn for_api(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
