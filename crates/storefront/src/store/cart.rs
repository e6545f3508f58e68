//! Cart and favorites collections.
//!
//! Both are persistent-style values: every change returns a new collection
//! and leaves the receiver untouched. Methods return `None` when the change
//! would be a no-op so callers can skip committing a new snapshot.

use serde::{Deserialize, Serialize};

use gigashop_core::{CartEntry, ProductId, Quantity};

/// Ordered cart lines, at most one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from raw entries, merging duplicate products into the
    /// first occurrence.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Self {
        entries
            .into_iter()
            .fold(Self::new(), |cart, entry| {
                cart.add(entry.product_id, entry.quantity)
            })
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Iterate over lines in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
        self.entries.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Line for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    /// Quantity of `product_id`, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<Quantity> {
        self.get(product_id).map(|e| e.quantity)
    }

    /// Merge-add: bump an existing line or append a new one.
    #[must_use]
    pub fn add(&self, product_id: ProductId, quantity: Quantity) -> Self {
        let mut entries = self.entries.clone();
        match entries.iter_mut().find(|e| e.product_id == product_id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
            None => entries.push(CartEntry::new(product_id, quantity)),
        }
        Self { entries }
    }

    /// Drop the line for `product_id`; `None` if there is none.
    #[must_use]
    pub fn remove(&self, product_id: ProductId) -> Option<Self> {
        self.get(product_id)?;
        Some(Self {
            entries: self
                .entries
                .iter()
                .filter(|e| e.product_id != product_id)
                .copied()
                .collect(),
        })
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// Returns `None` when the product is not in the cart (no line is
    /// created) or already has exactly this quantity.
    #[must_use]
    pub fn set_quantity(&self, product_id: ProductId, quantity: Quantity) -> Option<Self> {
        if self.quantity_of(product_id)? == quantity {
            return None;
        }
        Some(Self {
            entries: self
                .entries
                .iter()
                .map(|e| {
                    if e.product_id == product_id {
                        CartEntry::new(product_id, quantity)
                    } else {
                        *e
                    }
                })
                .collect(),
        })
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Insertion-ordered set of favorite product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<ProductId>,
}

impl Favorites {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Build a set from ids, keeping the first occurrence of duplicates.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            if !set.contains(id) {
                set.ids.push(id);
            }
        }
        set
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    /// Iterate over ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.ids.iter().copied()
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Set-insert; `None` if already present.
    #[must_use]
    pub fn insert(&self, id: ProductId) -> Option<Self> {
        if self.contains(id) {
            return None;
        }
        let mut ids = self.ids.clone();
        ids.push(id);
        Some(Self { ids })
    }

    /// Remove `id`; `None` if absent.
    #[must_use]
    pub fn remove(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        Some(Self {
            ids: self.ids.iter().copied().filter(|&f| f != id).collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn pid(n: i32) -> ProductId {
        ProductId::new(n)
    }

    #[test]
    fn test_add_merges_existing_line() {
        let cart = Cart::new().add(pid(1), qty(2)).add(pid(1), qty(3));
        assert_eq!(cart.entries(), &[CartEntry::new(pid(1), qty(5))]);
    }

    #[test]
    fn test_add_appends_new_lines_in_order() {
        let cart = Cart::new().add(pid(3), qty(1)).add(pid(1), qty(1)).add(pid(3), qty(1));
        let ids: Vec<_> = cart.iter().map(|e| e.product_id).collect();
        assert_eq!(ids, vec![pid(3), pid(1)]);
        assert_eq!(cart.quantity_of(pid(3)), Some(qty(2)));
    }

    #[test]
    fn test_add_leaves_original_untouched() {
        let original = Cart::new().add(pid(1), qty(1));
        let _ = original.add(pid(1), qty(1));
        assert_eq!(original.quantity_of(pid(1)), Some(qty(1)));
    }

    #[test]
    fn test_remove_absent_is_none() {
        let cart = Cart::new().add(pid(1), qty(1));
        assert!(cart.remove(pid(2)).is_none());
        assert!(cart.remove(pid(1)).unwrap().is_empty());
    }

    #[test]
    fn test_set_quantity_never_creates_line() {
        let cart = Cart::new().add(pid(1), qty(1));
        assert!(cart.set_quantity(pid(2), qty(4)).is_none());
        assert_eq!(
            cart.set_quantity(pid(1), qty(4)).unwrap().quantity_of(pid(1)),
            Some(qty(4))
        );
        assert!(cart.set_quantity(pid(1), qty(1)).is_none());
    }

    #[test]
    fn test_from_entries_merges_duplicates() {
        let cart = Cart::from_entries([
            CartEntry::new(pid(1), qty(1)),
            CartEntry::new(pid(2), qty(1)),
            CartEntry::new(pid(1), qty(2)),
        ]);
        assert_eq!(
            cart.entries(),
            &[
                CartEntry::new(pid(1), qty(3)),
                CartEntry::new(pid(2), qty(1))
            ]
        );
    }

    #[test]
    fn test_favorites_insert_idempotent() {
        let favorites = Favorites::new().insert(pid(5)).unwrap();
        assert!(favorites.insert(pid(5)).is_none());
        assert_eq!(favorites.ids(), &[pid(5)]);
    }

    #[test]
    fn test_favorites_from_ids_dedupes() {
        let favorites = Favorites::from_ids([pid(2), pid(1), pid(2)]);
        assert_eq!(favorites.ids(), &[pid(2), pid(1)]);
    }

    #[test]
    fn test_cart_serializes_as_array() {
        let cart = Cart::new().add(pid(2), qty(1));
        assert_eq!(
            serde_json::to_string(&cart).unwrap(),
            r#"[{"productId":2,"quantity":1}]"#
        );
    }
}
