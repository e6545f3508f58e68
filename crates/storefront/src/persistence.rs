//! Saving and restoring the persisted subset of the store.
//!
//! Only favorites and cart survive a session. They live under a single key,
//! [`STORAGE_KEY`], as:
//!
//! ```json
//! {"state": {"favorites": [3], "cart": [{"productId": 2, "quantity": 1}]}, "version": 0}
//! ```
//!
//! Reading also accepts the bare `{"favorites": .., "cart": ..}` object.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use gigashop_core::{CartEntry, KeyValueStore, ProductId, StorageError};

use crate::store::{Cart, Favorites, Snapshot, StoreAction, StoreState, StoreSubscriber};

/// Storage key holding the persisted store subset.
pub const STORAGE_KEY: &str = "product-storage";

/// Envelope version written alongside the state.
const STATE_VERSION: u32 = 0;

/// Errors raised while persisting store state.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to serialize store state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write store state: {0}")]
    Storage(#[from] StorageError),
}

/// The persisted subset of [`StoreState`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub favorites: Favorites,
    pub cart: Cart,
}

impl From<&StoreState> for PersistedState {
    fn from(state: &StoreState) -> Self {
        Self {
            favorites: state.favorites.clone(),
            cart: state.cart.clone(),
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    state: &'a PersistedState,
    version: u32,
}

/// Store subscriber writing favorites and cart after each commit.
#[derive(Clone)]
pub struct StatePersister {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for StatePersister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatePersister")
            .field("key", &STORAGE_KEY)
            .finish_non_exhaustive()
    }
}

impl StatePersister {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Write the persisted subset of `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn persist(&self, state: &StoreState) -> Result<(), PersistError> {
        let persisted = PersistedState::from(state);
        let body = serde_json::to_string(&Envelope {
            state: &persisted,
            version: STATE_VERSION,
        })?;
        self.storage.set(STORAGE_KEY, &body)?;
        debug!(
            favorites = persisted.favorites.len(),
            cart_lines = persisted.cart.len(),
            "Store state persisted"
        );
        Ok(())
    }
}

impl StoreSubscriber for StatePersister {
    fn on_commit(&self, action: &StoreAction, snapshot: &Snapshot) {
        // The product listing is never persisted.
        if matches!(action, StoreAction::SetProducts(_)) {
            return;
        }
        if let Err(e) = self.persist(snapshot) {
            warn!(error = %e, action = action.name(), "Failed to persist store state");
        }
    }
}

/// Restore favorites and cart from `storage`.
///
/// Never fails: unreadable or malformed data yields empty state, and a
/// malformed `favorites` or `cart` field falls back to empty on its own.
/// The product listing always starts empty.
#[must_use]
pub fn rehydrate(storage: &dyn KeyValueStore) -> StoreState {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return StoreState::default(),
        Err(e) => {
            warn!(error = %e, "Failed to read persisted store state");
            return StoreState::default();
        }
    };

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Persisted store state is not valid JSON, starting empty");
            return StoreState::default();
        }
    };

    let persisted = decode(&value);
    debug!(
        favorites = persisted.favorites.len(),
        cart_lines = persisted.cart.len(),
        "Store state rehydrated"
    );
    StoreState::with_persisted(persisted.favorites, persisted.cart)
}

fn decode(value: &Value) -> PersistedState {
    let state = match value.get("state") {
        Some(inner @ Value::Object(_)) => inner,
        _ => value,
    };

    let favorites = field::<Vec<ProductId>>(state, "favorites")
        .map(Favorites::from_ids)
        .unwrap_or_default();
    let cart = field::<Vec<CartEntry>>(state, "cart")
        .map(Cart::from_entries)
        .unwrap_or_default();

    PersistedState { favorites, cart }
}

fn field<T: serde::de::DeserializeOwned>(state: &Value, name: &str) -> Option<T> {
    let raw = state.get(name)?;
    match T::deserialize(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, field = name, "Malformed persisted field, using empty");
            None
        }
    }
}
