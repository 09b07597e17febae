//! Store configuration from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default base URL of the recipe API.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnvVar { name: &'static str, value: String },
}

/// Which store implementation backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// The recipe API over HTTP.
    Http,
    /// In-process store seeded with sample data.
    Memory,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Base URL of the recipe API (e.g., "http://localhost:8000").
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Http,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `COOKBOOK_STORE`: "http" (default) or "memory"
    /// - `COOKBOOK_API_URL`: API base URL (default: "http://localhost:8000")
    /// - `COOKBOOK_API_TIMEOUT_SECS`: Request timeout (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = match env::var("COOKBOOK_STORE").ok().as_deref() {
            None | Some("http") => StoreBackend::Http,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar {
                    name: "COOKBOOK_STORE",
                    value: other.to_string(),
                })
            }
        };

        let api_url = env::var("COOKBOOK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout = match env::var("COOKBOOK_API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: "COOKBOOK_API_TIMEOUT_SECS",
                    value: raw,
                })?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            backend,
            api_url,
            timeout,
        })
    }
}
