//! JSON HTTP client shared by the catalog and admin clients.
//!
//! Every request passes through the same two hooks:
//!
//! - **request**: if the client's [`TokenSlot`] holds a token, it is sent as
//!   `Authorization: Bearer <token>`;
//! - **response**: a 401 clears the token slot and surfaces
//!   [`ApiError::Unauthorized`] carrying the login route; 429 becomes
//!   [`ApiError::RateLimited`]; any other non-2xx becomes [`ApiError::Status`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::storage::{KeyValueStore, StorageError};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Route the user is sent to after a 401.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Number of response body characters kept in errors.
const ERROR_BODY_LIMIT: usize = 200;

/// Errors that can occur when calling the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    /// API rejected the credentials; the stored token has been cleared.
    #[error("Unauthorized, sign in again at {login_route}")]
    Unauthorized { login_route: String },

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Token storage failed.
    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Connection settings for an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every request path is appended to.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Route reported by [`ApiError::Unauthorized`].
    pub login_route: String,
}

impl ApiConfig {
    /// Settings with the default timeout and login route.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// TokenSlot
// =============================================================================

/// A named key in a [`KeyValueStore`] holding an opaque bearer token.
#[derive(Clone)]
pub struct TokenSlot {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSlot")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl TokenSlot {
    /// Create a slot for `key` in `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Storage key of this slot.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored token. Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read.
    pub fn get(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .storage
            .get(&self.key)?
            .filter(|token| !token.is_empty())
            .map(SecretString::from))
    }

    /// Store a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    pub fn set(&self, token: &SecretString) -> Result<(), StorageError> {
        self.storage.set(&self.key, token.expose_secret())
    }

    /// Remove the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// JSON client for the catalog API.
///
/// Cheap to clone; clones share the connection pool and token slot.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    login_route: String,
    token: Option<TokenSlot>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("token", &self.inner.token)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, token: Option<TokenSlot>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                login_route: config.login_route.clone(),
                token,
            }),
        })
    }

    /// Absolute URL for an API path such as `/products/1`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// The token slot this client authenticates with, if any.
    #[must_use]
    pub fn token_slot(&self) -> Option<&TokenSlot> {
        self.inner.token.as_ref()
    }

    /// Execute a GET request and parse the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns a non-success
    /// status, or the body is not valid JSON for `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.inner.client.get(self.url(path));
        let body = self.send(request).await?.text().await?;
        parse_body(&body)
    }

    /// Execute a GET request where an empty or `null` body means "absent".
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_json`].
    pub async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        let request = self.inner.client.get(self.url(path));
        let body = self.send(request).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        parse_body(&body)
    }

    /// Execute a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_json`].
    pub async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.post(self.url(path)).json(body);
        let body = self.send(request).await?.text().await?;
        parse_body(&body)
    }

    /// Execute a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_json`].
    pub async fn put_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.put(self.url(path)).json(body);
        let body = self.send(request).await?.text().await?;
        parse_body(&body)
    }

    /// Execute a DELETE request, discarding the body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API returns a
    /// non-success status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.inner.client.delete(self.url(path));
        self.send(request).await?;
        Ok(())
    }

    /// Attach the bearer token, if one is stored.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let Some(slot) = &self.inner.token else {
            return request;
        };

        match slot.get() {
            Ok(Some(token)) => request.bearer_auth(token.expose_secret()),
            Ok(None) => request,
            Err(e) => {
                warn!(error = %e, slot = slot.key(), "Failed to read auth token");
                request
            }
        }
    }

    /// Send a request and map error statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(status = %status, url = %response.url(), "API request succeeded");
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            if let Some(slot) = &self.inner.token
                && let Err(e) = slot.clear()
            {
                warn!(error = %e, slot = slot.key(), "Failed to clear auth token");
            }
            warn!(
                login_route = %self.inner.login_route,
                "API rejected credentials, token cleared"
            );
            return Err(ApiError::Unauthorized {
                login_route: self.inner.login_route.clone(),
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await.unwrap_or_default();
        error!(
            status = %status,
            body = %truncate(&body, 500),
            "API returned non-success status"
        );
        Err(ApiError::Status {
            status: status.as_u16(),
            body: truncate(&body, ERROR_BODY_LIMIT),
        })
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        error!(
            error = %e,
            body = %truncate(body, 500),
            "Failed to parse API response"
        );
        ApiError::Parse(e)
    })
}

fn truncate(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig::new(Url::parse(base).unwrap()), None).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        assert_eq!(
            client("https://fakestoreapi.com").url("/products/1"),
            "https://fakestoreapi.com/products/1"
        );
        assert_eq!(
            client("http://localhost:8080/api/").url("/products"),
            "http://localhost:8080/api/products"
        );
    }

    #[test]
    fn test_token_slot_round_trip() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
        let slot = TokenSlot::new(Arc::clone(&storage), "token");

        assert!(slot.get().unwrap().is_none());

        slot.set(&SecretString::from("abc123")).unwrap();
        assert_eq!(slot.get().unwrap().unwrap().expose_secret(), "abc123");
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc123"));

        slot.clear().unwrap();
        assert!(slot.get().unwrap().is_none());
    }

    #[test]
    fn test_token_slot_empty_string_is_absent() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
        storage.set("token", "").unwrap();
        assert!(TokenSlot::new(storage, "token").get().unwrap().is_none());
    }

    #[test]
    fn test_token_slot_debug_hides_storage() {
        let slot = TokenSlot::new(Arc::new(MemoryStorage::new()), "adminToken");
        assert!(format!("{slot:?}").contains("adminToken"));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Unauthorized {
            login_route: "/login".to_string(),
        };
        assert_eq!(err.to_string(), "Unauthorized, sign in again at /login");

        let err = ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");

        assert_eq!(
            ApiError::RateLimited(30).to_string(),
            "Rate limited, retry after 30 seconds"
        );
    }

    #[test]
    fn test_parse_body_null_is_none() {
        let parsed: Option<u32> = parse_body("null").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("héllo", 2), "hé");
    }
}
