//! Display models for the view layer.
//!
//! These turn store state into ready-to-print strings so front ends never
//! format prices or stock labels themselves.

use rust_decimal::Decimal;

use gigashop_core::Product;

use crate::store::StoreState;
use crate::store::selectors::{self, CartLine};

/// Product display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub stock: &'static str,
    pub in_stock: bool,
    pub favorite: bool,
}

impl ProductView {
    /// Build the view of `product` as seen from `state`.
    #[must_use]
    pub fn new(product: &Product, state: &StoreState) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            stock: product.stock_label(),
            in_stock: product.in_stock,
            favorite: selectors::is_favorite(state, product.id),
        }
    }

    /// Heart marker shown next to the name.
    #[must_use]
    pub const fn favorite_marker(&self) -> &'static str {
        if self.favorite { "♥" } else { "♡" }
    }
}

/// One cart line for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub product_id: i32,
    /// Product name, or `Product #<id>` when it is not in the cached listing.
    pub title: String,
    pub quantity: u32,
    pub price: Option<String>,
    pub line_price: Option<String>,
}

impl From<&CartLine<'_>> for CartItemView {
    fn from(line: &CartLine<'_>) -> Self {
        let product_id = line.entry.product_id;
        Self {
            product_id: product_id.as_i32(),
            title: line
                .product
                .map_or_else(|| format!("Product #{product_id}"), |p| p.name.clone()),
            quantity: line.entry.quantity.get(),
            price: line.product.map(|p| p.price.to_string()),
            line_price: line.line_total().map(format_price),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: format_price(Decimal::ZERO),
            item_count: 0,
        }
    }
}

impl From<&StoreState> for CartView {
    fn from(state: &StoreState) -> Self {
        Self {
            items: selectors::cart_lines(state)
                .iter()
                .map(CartItemView::from)
                .collect(),
            subtotal: format_price(selectors::cart_subtotal(state)),
            item_count: selectors::cart_item_count(state),
        }
    }
}

/// Format an amount as `$12.50`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
