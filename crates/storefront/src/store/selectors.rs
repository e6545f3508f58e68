//! Derived reads over a [`StoreState`].

use rust_decimal::Decimal;

use gigashop_core::{CartEntry, Product, ProductId};

use super::StoreState;

/// A cart line joined with its cached product, if the listing has it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine<'a> {
    pub entry: CartEntry,
    pub product: Option<&'a Product>,
}

impl CartLine<'_> {
    /// `price * quantity`, or `None` when the product is not cached.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.product.map(|p| p.price.times(self.entry.quantity))
    }
}

/// Whether `id` is a favorite.
#[must_use]
pub fn is_favorite(state: &StoreState, id: ProductId) -> bool {
    state.favorites.contains(id)
}

/// Total units across all cart lines.
#[must_use]
pub fn cart_item_count(state: &StoreState) -> u64 {
    state
        .cart
        .iter()
        .map(|e| u64::from(e.quantity.get()))
        .sum()
}

/// Cached product with this id.
#[must_use]
pub fn find_product(state: &StoreState, id: ProductId) -> Option<&Product> {
    state.products.iter().find(|p| p.id == id)
}

/// Cart lines in cart order, joined with cached products.
#[must_use]
pub fn cart_lines(state: &StoreState) -> Vec<CartLine<'_>> {
    state
        .cart
        .iter()
        .map(|entry| CartLine {
            entry: *entry,
            product: find_product(state, entry.product_id),
        })
        .collect()
}

/// Sum of line totals over lines whose product is cached, saturating at
/// `Decimal::MAX`.
#[must_use]
pub fn cart_subtotal(state: &StoreState) -> Decimal {
    cart_lines(state)
        .iter()
        .filter_map(CartLine::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Cached favorite products, in the order they were favorited.
#[must_use]
pub fn favorite_products(state: &StoreState) -> Vec<&Product> {
    state
        .favorites
        .iter()
        .filter_map(|id| find_product(state, id))
        .collect()
}
