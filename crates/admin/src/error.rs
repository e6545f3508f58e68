//! Unified error handling for admin.

use thiserror::Error;

use gigashop_core::http::ApiError;
use gigashop_core::StorageError;

use crate::config::ConfigError;

/// Error type for admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// API request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before it reached the API.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Token storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AdminError {
    /// Whether this error is worth an error-tracking event.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        !matches!(self, Self::NotFound(_) | Self::Validation(_))
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_error_display() {
        let err = AdminError::NotFound("product 99".to_string());
        assert_eq!(err.to_string(), "Not found: product 99");

        let err = AdminError::Validation("name must not be empty".to_string());
        assert!(!err.is_reportable());
    }
}
