//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ADMIN_API_URL` - Catalog API base URL used by the admin panel
//!   (default: <https://fakestoreapi.com>)
//! - `ADMIN_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `ADMIN_STORAGE_PATH` - JSON file holding the admin token
//!   (default: `.gigashop/admin.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use gigashop_core::http::ApiConfig;

const DEFAULT_API_URL: &str = "https://fakestoreapi.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORAGE_PATH: &str = ".gigashop/admin.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// API base URL
    pub api_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Local storage file for the admin token
    pub storage_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = match get("ADMIN_API_URL") {
            Some(raw) => Url::parse(&raw)
                .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_API_URL".to_string(), e.to_string()))?,
            None => Url::parse(DEFAULT_API_URL)
                .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_API_URL".to_string(), e.to_string()))?,
        };

        let timeout_secs = match get("ADMIN_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("ADMIN_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_TIMEOUT_SECS".to_string(),
                "must be at least 1 second".to_string(),
            ));
        }

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            storage_path: get("ADMIN_STORAGE_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from),
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Connection settings for the admin API client.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api_url.clone()).with_timeout(self.timeout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdminConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_url.as_str(), "https://fakestoreapi.com/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.storage_path, PathBuf::from(".gigashop/admin.json"));
    }

    #[test]
    fn test_overrides() {
        let config = AdminConfig::from_lookup(|key| match key {
            "ADMIN_API_URL" => Some("http://localhost:9000".to_string()),
            "ADMIN_TIMEOUT_SECS" => Some("30".to_string()),
            "SENTRY_DSN" => Some("https://key@sentry.example.com/1".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_config().base_url.as_str(), "http://localhost:9000/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_values() {
        let err = AdminConfig::from_lookup(|key| {
            (key == "ADMIN_TIMEOUT_SECS").then(|| "ten".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ADMIN_TIMEOUT_SECS"));

        let err =
            AdminConfig::from_lookup(|key| (key == "ADMIN_API_URL").then(|| "::".to_string()))
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ADMIN_API_URL"));
    }
}
