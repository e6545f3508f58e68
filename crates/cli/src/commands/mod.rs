//! Command implementations.
//!
//! Every command writes its human-readable output to the `out` writer it is
//! given; diagnostics go through `tracing`.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod favorites;
pub mod products;

use std::io::{self, Write};

use thiserror::Error;

use gigashop_admin::error::AdminError;
use gigashop_core::QuantityError;
use gigashop_storefront::catalog::CatalogError;
use gigashop_storefront::error::{AppError, report_error};
use gigashop_storefront::state::AppState;
use gigashop_storefront::views::ProductView;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storefront(#[from] AppError),

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("Usage error: {0}")]
    Usage(String),
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        Self::Storefront(err.into())
    }
}

impl From<QuantityError> for CliError {
    fn from(err: QuantityError) -> Self {
        Self::Storefront(err.into())
    }
}

impl CliError {
    /// Log the failure and capture it to Sentry when it is worth an event.
    pub fn report(&self) {
        match self {
            Self::Storefront(e) => report_error(e),
            Self::Admin(e) if e.is_reportable() => {
                let event_id = sentry::capture_error(e);
                tracing::error!(error = %e, sentry_event_id = %event_id, "Admin command failed");
            }
            Self::Admin(e) => tracing::warn!(error = %e, "Admin command rejected"),
            Self::Io(e) => tracing::error!(error = %e, "Command failed"),
            Self::Usage(msg) => tracing::warn!("{msg}"),
        }
    }
}

/// Fetch the product listing so names and prices can be shown.
///
/// A failed fetch is logged and the command carries on with whatever the
/// store already has; cart and favorites stay usable offline.
pub(crate) async fn load_listing(state: &mut AppState) {
    if let Err(e) = state.refresh_products().await {
        tracing::warn!(error = %e, "Could not load the product listing");
    }
}

/// Write one product listing row.
pub(crate) fn write_product_row(out: &mut impl Write, view: &ProductView) -> io::Result<()> {
    writeln!(
        out,
        "{:>4}  {}  {:<40}  {:>9}  {}",
        view.id,
        view.favorite_marker(),
        truncate(&view.name, 40),
        view.price,
        view.stock
    )
}

/// Write the full product detail block.
pub(crate) fn write_product_detail(out: &mut impl Write, view: &ProductView) -> io::Result<()> {
    writeln!(out, "{} {}", view.favorite_marker(), view.name)?;
    writeln!(out, "  id:        {}", view.id)?;
    writeln!(out, "  price:     {}", view.price)?;
    writeln!(out, "  category:  {}", view.category)?;
    writeln!(out, "  stock:     {}", view.stock)?;
    writeln!(out, "  image:     {}", view.image)?;
    if !view.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", view.description)?;
    }
    Ok(())
}

/// Cut `s` to at most `max` characters, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Session over in-memory storage for command tests.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn memory_session() -> AppState {
    use std::sync::Arc;

    use gigashop_core::MemoryStorage;
    use gigashop_storefront::config::StorefrontConfig;

    let config = StorefrontConfig::from_lookup(|_| None).unwrap();
    AppState::with_storage(config, Arc::new(MemoryStorage::new())).unwrap()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn view() -> ProductView {
        ProductView {
            id: 2,
            name: "Mens Casual Premium Slim Fit T-Shirts".to_string(),
            price: "$22.30".to_string(),
            description: "Slim-fitting style".to_string(),
            image: "https://example.com/2.jpg".to_string(),
            category: "men's clothing".to_string(),
            stock: "In Stock",
            in_stock: true,
            favorite: true,
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn test_product_row() {
        let mut out = Vec::new();
        write_product_row(&mut out, &view()).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(line.starts_with("   2  ♥  Mens Casual"));
        assert!(line.contains("$22.30"));
        assert!(line.trim_end().ends_with("In Stock"));
    }

    #[test]
    fn test_product_detail() {
        let mut out = Vec::new();
        write_product_detail(&mut out, &view()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("category:  men's clothing"));
        assert!(text.ends_with("Slim-fitting style\n"));
    }
}
