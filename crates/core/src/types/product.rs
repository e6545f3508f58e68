//! Storefront product record.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as the storefront sees it.
///
/// Sourced from the catalog API; consumers only ever hold whole copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Long-form description.
    pub description: String,
    /// Image URL.
    pub image: String,
    /// Category name (e.g., "electronics").
    pub category: String,
    /// Whether the product can be added to a cart.
    pub in_stock: bool,
}

impl Product {
    /// Label shown next to the product ("In Stock" / "Out of Stock").
    #[must_use]
    pub const fn stock_label(&self) -> &'static str {
        if self.in_stock {
            "In Stock"
        } else {
            "Out of Stock"
        }
    }
}
