//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_API_URL` - Catalog API base URL (default: <https://fakestoreapi.com>)
//! - `CATALOG_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `STOREFRONT_STORAGE_PATH` - JSON file holding cart, favorites and the
//!   auth token (default: `.gigashop/storefront.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use gigashop_core::http::ApiConfig;

/// Default catalog API base URL.
pub const DEFAULT_CATALOG_API_URL: &str = "https://fakestoreapi.com";

const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_STORAGE_PATH: &str = ".gigashop/storefront.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog API base URL
    pub catalog_url: Url,
    /// Per-request timeout for catalog calls
    pub catalog_timeout: Duration,
    /// Local storage file for persisted state and the auth token
    pub storage_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
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
        let catalog_url = parse_url(&lookup, "CATALOG_API_URL", DEFAULT_CATALOG_API_URL)?;
        let catalog_timeout = parse_timeout(&lookup, "CATALOG_TIMEOUT_SECS")?;
        let storage_path = PathBuf::from(get_env_or_default(
            &lookup,
            "STOREFRONT_STORAGE_PATH",
            DEFAULT_STORAGE_PATH,
        ));

        Ok(Self {
            catalog_url,
            catalog_timeout,
            storage_path,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Connection settings for the catalog client.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.catalog_url.clone()).with_timeout(self.catalog_timeout)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

fn parse_url(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<Url, ConfigError> {
    let raw = get_env_or_default(lookup, key, default);
    let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_timeout(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Duration, ConfigError> {
    let secs = get_env_or_default(lookup, key, DEFAULT_TIMEOUT_SECS)
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be at least 1 second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}
