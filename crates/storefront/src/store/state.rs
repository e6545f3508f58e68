//! Store state and its pure transition function.

use std::sync::Arc;

use gigashop_core::{Product, ProductId, Quantity};

use super::cart::{Cart, Favorites};

/// Everything the storefront keeps in memory for a session.
///
/// Cloning is cheap: the product listing is shared behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Cached catalog listing. Never persisted.
    pub products: Arc<[Product]>,
    /// Favorite product ids.
    pub favorites: Favorites,
    /// Cart lines.
    pub cart: Cart,
}

impl StoreState {
    /// State seeded with persisted favorites and cart and no products.
    #[must_use]
    pub fn with_persisted(favorites: Favorites, cart: Cart) -> Self {
        Self {
            products: Arc::from(Vec::new()),
            favorites,
            cart,
        }
    }

    /// Compute the state that results from `action`.
    ///
    /// Returns `None` if the action leaves the state unchanged.
    #[must_use]
    pub fn apply(&self, action: &StoreAction) -> Option<Self> {
        match action {
            StoreAction::SetProducts(products) => {
                if *self.products == **products {
                    return None;
                }
                Some(Self {
                    products: Arc::clone(products),
                    ..self.clone()
                })
            }
            StoreAction::AddToFavorites(id) => self.with_favorites(self.favorites.insert(*id)),
            StoreAction::RemoveFromFavorites(id) => {
                self.with_favorites(self.favorites.remove(*id))
            }
            StoreAction::ToggleFavorite(id) => {
                if self.favorites.contains(*id) {
                    self.with_favorites(self.favorites.remove(*id))
                } else {
                    self.with_favorites(self.favorites.insert(*id))
                }
            }
            StoreAction::AddToCart {
                product_id,
                quantity,
            } => self.with_cart(Some(self.cart.add(*product_id, *quantity))),
            StoreAction::RemoveFromCart(id) => self.with_cart(self.cart.remove(*id)),
            StoreAction::UpdateCartQuantity {
                product_id,
                quantity,
            } => match Quantity::clamped(*quantity) {
                Some(quantity) => self.with_cart(self.cart.set_quantity(*product_id, quantity)),
                None => self.with_cart(self.cart.remove(*product_id)),
            },
            StoreAction::ClearCart => {
                if self.cart.is_empty() {
                    return None;
                }
                self.with_cart(Some(Cart::new()))
            }
        }
    }

    fn with_favorites(&self, favorites: Option<Favorites>) -> Option<Self> {
        favorites.map(|favorites| Self {
            favorites,
            ..self.clone()
        })
    }

    fn with_cart(&self, cart: Option<Cart>) -> Option<Self> {
        cart.map(|cart| Self {
            cart,
            ..self.clone()
        })
    }
}

/// A mutation request against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Replace the cached product listing.
    SetProducts(Arc<[Product]>),
    /// Mark a product as favorite.
    AddToFavorites(ProductId),
    /// Unmark a favorite.
    RemoveFromFavorites(ProductId),
    /// Flip the favorite flag of a product.
    ToggleFavorite(ProductId),
    /// Merge-add units of a product.
    AddToCart {
        product_id: ProductId,
        quantity: Quantity,
    },
    /// Drop a cart line.
    RemoveFromCart(ProductId),
    /// Overwrite a line's quantity; `<= 0` removes the line.
    UpdateCartQuantity { product_id: ProductId, quantity: i64 },
    /// Empty the cart.
    ClearCart,
}

impl StoreAction {
    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetProducts(_) => "set_products",
            Self::AddToFavorites(_) => "add_to_favorites",
            Self::RemoveFromFavorites(_) => "remove_from_favorites",
            Self::ToggleFavorite(_) => "toggle_favorite",
            Self::AddToCart { .. } => "add_to_cart",
            Self::RemoveFromCart(_) => "remove_from_cart",
            Self::UpdateCartQuantity { .. } => "update_cart_quantity",
            Self::ClearCart => "clear_cart",
        }
    }
}
