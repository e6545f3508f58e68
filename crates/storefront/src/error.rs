//! Unified error handling with Sentry integration.
//!
//! Provides the storefront-level `AppError` every front end deals in, plus
//! helpers that feed the Sentry breadcrumb trail and capture failures.

use thiserror::Error;

use gigashop_core::{QuantityError, StorageError};

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persistence::PersistError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Writing the store state failed.
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    /// A cart quantity was rejected.
    #[error("Invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected by a storefront rule (e.g., out of stock).
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error is worth an error-tracking event.
    ///
    /// User mistakes (bad input, unknown ids) are not.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        !matches!(
            self,
            Self::NotFound(_) | Self::BadRequest(_) | Self::Quantity(_)
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Capture `error` to Sentry (when it is reportable) and log it.
pub fn report_error(error: &AppError) {
    if error.is_reportable() {
        let event_id = sentry::capture_error(error);
        tracing::error!(
            error = %error,
            sentry_event_id = %event_id,
            "Storefront error"
        );
    } else {
        tracing::warn!(error = %error, "Storefront request rejected");
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "add_to_cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
