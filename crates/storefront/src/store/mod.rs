//! Cart/favorites store.
//!
//! [`ProductStore`] is the session's single source of truth for the cached
//! product listing, favorites and cart.
//!
//! # Snapshots
//!
//! State lives in an immutable, `Arc`-backed [`Snapshot`] tagged with a
//! version number. A mutation computes the next [`StoreState`] with the pure
//! [`StoreState::apply`], installs it as a new snapshot with `version + 1`,
//! then notifies every [`StoreSubscriber`]. Snapshots handed out earlier are
//! never modified, so a consumer detects change by comparing versions.
//! Actions that would not change anything install nothing and notify no one.
//!
//! # Example
//!
//! ```
//! use gigashop_core::{ProductId, Quantity};
//! use gigashop_storefront::store::ProductStore;
//!
//! let mut store = ProductStore::new();
//! let before = store.snapshot();
//!
//! store.add_to_cart(ProductId::new(1), Quantity::ONE);
//! store.add_to_cart(ProductId::new(1), Quantity::ONE);
//!
//! assert_eq!(store.cart().quantity_of(ProductId::new(1)).map(Quantity::get), Some(2));
//! assert!(before.cart.is_empty());
//! assert_eq!(store.version(), before.version() + 2);
//! ```

mod cart;
pub mod selectors;
mod state;

pub use cart::{Cart, Favorites};
pub use state::{StoreAction, StoreState};

use std::ops::Deref;
use std::sync::Arc;

use tracing::debug;

use gigashop_core::{Product, ProductId, Quantity};

use crate::error::add_breadcrumb;

/// An immutable, versioned view of the store state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    state: Arc<StoreState>,
    version: u64,
}

impl Snapshot {
    fn initial(state: StoreState) -> Self {
        Self {
            state: Arc::new(state),
            version: 0,
        }
    }

    /// Monotonic version; bumps once per committed change.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// The state this snapshot holds.
    #[must_use]
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Whether two snapshots are the same installed state.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Deref for Snapshot {
    type Target = StoreState;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

/// Receives every committed snapshot.
pub trait StoreSubscriber {
    /// Called after `action` produced `snapshot`.
    fn on_commit(&self, action: &StoreAction, snapshot: &Snapshot);
}

impl<F> StoreSubscriber for F
where
    F: Fn(&StoreAction, &Snapshot),
{
    fn on_commit(&self, action: &StoreAction, snapshot: &Snapshot) {
        self(action, snapshot);
    }
}

/// The session's cart/favorites store.
#[derive(Default)]
pub struct ProductStore {
    current: Snapshot,
    subscribers: Vec<Box<dyn StoreSubscriber>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::initial(StoreState::default())
    }
}

impl std::fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductStore")
            .field("current", &self.current)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl ProductStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store starting from `state` (e.g., rehydrated from storage).
    #[must_use]
    pub fn with_state(state: StoreState) -> Self {
        Self {
            current: Snapshot::initial(state),
            subscribers: Vec::new(),
        }
    }

    /// Register a subscriber notified after every committed change.
    pub fn subscribe(&mut self, subscriber: impl StoreSubscriber + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.current.clone()
    }

    /// Borrow the current state.
    #[must_use]
    pub fn state(&self) -> &StoreState {
        &self.current
    }

    /// Version of the current snapshot.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.current.version
    }

    /// Cached product listing.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.current.products
    }

    /// Favorite product ids.
    #[must_use]
    pub fn favorites(&self) -> &Favorites {
        &self.current.favorites
    }

    /// Cart lines.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.current.cart
    }

    /// Apply an action, installing a new snapshot if the state changed.
    pub fn dispatch(&mut self, action: StoreAction) {
        let Some(next) = self.current.apply(&action) else {
            debug!(action = action.name(), "Store action was a no-op");
            return;
        };

        self.current = Snapshot {
            state: Arc::new(next),
            version: self.current.version + 1,
        };
        debug!(
            action = action.name(),
            version = self.current.version,
            cart_lines = self.current.cart.len(),
            favorites = self.current.favorites.len(),
            "Store state committed"
        );
        add_breadcrumb("store", action.name(), None);

        for subscriber in &self.subscribers {
            subscriber.on_commit(&action, &self.current);
        }
    }

    /// Replace the cached product listing.
    pub fn set_products(&mut self, products: impl Into<Arc<[Product]>>) {
        self.dispatch(StoreAction::SetProducts(products.into()));
    }

    /// Mark a product as favorite. No-op if it already is.
    pub fn add_to_favorites(&mut self, product_id: ProductId) {
        self.dispatch(StoreAction::AddToFavorites(product_id));
    }

    /// Unmark a favorite. No-op if it is not one.
    pub fn remove_from_favorites(&mut self, product_id: ProductId) {
        self.dispatch(StoreAction::RemoveFromFavorites(product_id));
    }

    /// Add the product to favorites, or remove it if already there.
    pub fn toggle_favorite(&mut self, product_id: ProductId) {
        self.dispatch(StoreAction::ToggleFavorite(product_id));
    }

    /// Add units of a product, merging with an existing line.
    pub fn add_to_cart(&mut self, product_id: ProductId, quantity: Quantity) {
        self.dispatch(StoreAction::AddToCart {
            product_id,
            quantity,
        });
    }

    /// Remove a product's line. No-op if absent.
    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        self.dispatch(StoreAction::RemoveFromCart(product_id));
    }

    /// Overwrite a line's quantity.
    ///
    /// `quantity <= 0` removes the line. A product not already in the cart
    /// is left out; use [`ProductStore::add_to_cart`] to create lines.
    pub fn update_cart_quantity(&mut self, product_id: ProductId, quantity: i64) {
        self.dispatch(StoreAction::UpdateCartQuantity {
            product_id,
            quantity,
        });
    }

    /// Empty the cart. Favorites and products are untouched.
    pub fn clear_cart(&mut self) {
        self.dispatch(StoreAction::ClearCart);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gigashop_core::{CartEntry, Price};
    use rust_decimal::Decimal;

    use super::*;

    fn pid(n: i32) -> ProductId {
        ProductId::new(n)
    }

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn product(id: i32) -> Product {
        Product {
            id: pid(id),
            name: format!("Product {id}"),
            price: Price::new(Decimal::new(1000, 2)).unwrap(),
            description: String::new(),
            image: String::new(),
            category: "misc".to_string(),
            in_stock: true,
        }
    }

    #[test]
    fn test_set_products_replaces_listing() {
        let mut store = ProductStore::new();
        store.set_products(vec![product(1), product(2)]);
        store.set_products(vec![product(3)]);
        assert_eq!(store.products(), &[product(3)]);
    }

    #[test]
    fn test_set_products_idempotent() {
        let mut store = ProductStore::new();
        store.set_products(vec![product(1)]);
        let version = store.version();
        store.set_products(vec![product(1)]);
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_favorites_add_then_remove_restores_set() {
        let mut store = ProductStore::new();
        store.add_to_favorites(pid(1));
        let original = store.favorites().clone();

        store.add_to_favorites(pid(2));
        store.remove_from_favorites(pid(2));

        assert_eq!(store.favorites(), &original);
    }

    #[test]
    fn test_add_to_favorites_twice_is_idempotent() {
        let mut store = ProductStore::new();
        store.add_to_favorites(pid(4));
        let after_first = store.snapshot();
        store.add_to_favorites(pid(4));

        assert_eq!(store.favorites().ids(), &[pid(4)]);
        assert!(store.snapshot().ptr_eq(&after_first));
    }

    #[test]
    fn test_remove_absent_favorite_is_noop() {
        let mut store = ProductStore::new();
        store.remove_from_favorites(pid(9));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_toggle_favorite() {
        let mut store = ProductStore::new();
        store.toggle_favorite(pid(3));
        assert!(store.favorites().contains(pid(3)));
        store.toggle_favorite(pid(3));
        assert!(!store.favorites().contains(pid(3)));
    }

    #[test]
    fn test_add_to_cart_merges() {
        let mut store = ProductStore::new();
        store.add_to_cart(pid(7), qty(2));
        store.add_to_cart(pid(7), qty(3));
        assert_eq!(store.cart().entries(), &[CartEntry::new(pid(7), qty(5))]);
    }

    #[test]
    fn test_cart_scenario() {
        let mut store = ProductStore::new();

        store.add_to_cart(pid(1), Quantity::ONE);
        assert_eq!(store.cart().entries(), &[CartEntry::new(pid(1), qty(1))]);

        store.add_to_cart(pid(1), Quantity::ONE);
        assert_eq!(store.cart().entries(), &[CartEntry::new(pid(1), qty(2))]);

        store.add_to_cart(pid(2), Quantity::ONE);
        assert_eq!(
            store.cart().entries(),
            &[
                CartEntry::new(pid(1), qty(2)),
                CartEntry::new(pid(2), qty(1))
            ]
        );

        store.remove_from_cart(pid(1));
        assert_eq!(store.cart().entries(), &[CartEntry::new(pid(2), qty(1))]);
    }

    #[test]
    fn test_update_cart_quantity_zero_removes() {
        let mut store = ProductStore::new();
        store.add_to_cart(pid(1), qty(3));
        store.update_cart_quantity(pid(1), 0);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_update_cart_quantity_negative_removes() {
        let mut store = ProductStore::new();
        store.add_to_cart(pid(1), qty(3));
        store.update_cart_quantity(pid(1), -2);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_update_cart_quantity_absent_is_noop() {
        let mut store = ProductStore::new();
        store.add_to_cart(pid(1), qty(1));
        let before = store.snapshot();

        store.update_cart_quantity(pid(2), 0);
        store.update_cart_quantity(pid(2), 5);

        assert_eq!(store.cart(), &before.cart);
        assert_eq!(store.version(), before.version());
    }

    #[test]
    fn test_update_cart_quantity_overwrites() {
        let mut store = ProductStore::new();
        store.add_to_cart(pid(1), qty(1));
        store.add_to_cart(pid(2), qty(1));
        store.update_cart_quantity(pid(1), 6);
        assert_eq!(
            store.cart().entries(),
            &[
                CartEntry::new(pid(1), qty(6)),
                CartEntry::new(pid(2), qty(1))
            ]
        );
    }

    #[test]
    fn test_update_cart_quantity_clamps_large_values() {
        let mut store = ProductStore::new();
        store.add_to_cart(pid(1), qty(1));
        store.update_cart_quantity(pid(1), i64::MAX);
        assert_eq!(store.cart().quantity_of(pid(1)), Some(qty(u32::MAX)));
    }

    #[test]
    fn test_clear_cart_keeps_favorites() {
        let mut store = ProductStore::new();
        store.set_products(vec![product(1)]);
        store.add_to_favorites(pid(1));
        store.add_to_cart(pid(1), qty(2));
        store.add_to_cart(pid(2), qty(1));

        store.clear_cart();

        assert!(store.cart().is_empty());
        assert_eq!(store.favorites().ids(), &[pid(1)]);
        assert_eq!(store.products().len(), 1);
    }

    #[test]
    fn test_clear_empty_cart_is_noop() {
        let mut store = ProductStore::new();
        store.clear_cart();
        assert!(store.cart().is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_old_snapshots_are_not_mutated() {
        let mut store = ProductStore::new();
        store.add_to_cart(pid(1), qty(1));
        let old = store.snapshot();

        store.add_to_cart(pid(1), qty(1));
        store.add_to_favorites(pid(1));

        assert_eq!(old.cart.quantity_of(pid(1)), Some(qty(1)));
        assert!(old.favorites.is_empty());
        assert!(!old.ptr_eq(&store.snapshot()));
    }

    #[test]
    fn test_subscribers_see_committed_changes_only() {
        let seen: Rc<RefCell<Vec<(&'static str, u64)>>> = Rc::default();
        let mut store = ProductStore::new();
        let sink = Rc::clone(&seen);
        store.subscribe(move |action: &StoreAction, snapshot: &Snapshot| {
            sink.borrow_mut().push((action.name(), snapshot.version()));
        });

        store.add_to_favorites(pid(1));
        store.add_to_favorites(pid(1));
        store.remove_from_cart(pid(1));
        store.add_to_cart(pid(1), Quantity::ONE);

        assert_eq!(
            *seen.borrow(),
            vec![("add_to_favorites", 1), ("add_to_cart", 2)]
        );
    }
}
