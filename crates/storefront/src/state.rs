//! Session state owned by a storefront front end.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;

use gigashop_core::http::TokenSlot;
use gigashop_core::{FileStorage, KeyValueStore, Product, ProductId, Quantity};

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::persistence::{StatePersister, rehydrate};
use crate::store::{ProductStore, selectors};

/// Storage key of the storefront auth token.
pub const TOKEN_KEY: &str = "token";

/// Everything a storefront session needs: configuration, local storage,
/// the catalog client and the cart/favorites store.
///
/// The store is rehydrated from storage on construction and written back
/// after every committed change.
pub struct AppState {
    config: StorefrontConfig,
    storage: Arc<dyn KeyValueStore>,
    catalog: CatalogClient,
    store: ProductStore,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Open the session backed by the configured storage file.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::new(&config.storage_path));
        Self::with_storage(config, storage)
    }

    /// Open the session on an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let token = TokenSlot::new(Arc::clone(&storage), TOKEN_KEY);
        let catalog = CatalogClient::new(&config.api_config(), Some(token))?;

        let mut store = ProductStore::with_state(rehydrate(storage.as_ref()));
        store.subscribe(StatePersister::new(Arc::clone(&storage)));

        Ok(Self {
            config,
            storage,
            catalog,
            store,
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    /// Get a reference to the cart/favorites store.
    #[must_use]
    pub const fn store(&self) -> &ProductStore {
        &self.store
    }

    /// Get a mutable reference to the cart/favorites store.
    pub fn store_mut(&mut self) -> &mut ProductStore {
        &mut self.store
    }

    /// Fetch the product listing and install it in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog request fails.
    pub async fn refresh_products(&mut self) -> Result<()> {
        let products = self.catalog.get_products().await?;
        self.store.set_products(products);
        Ok(())
    }

    /// Look a product up in the cached listing, falling back to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown ids, or an error if the
    /// catalog request fails.
    pub async fn product(&self, id: ProductId) -> Result<Product> {
        if let Some(product) = selectors::find_product(self.store.state(), id) {
            return Ok(product.clone());
        }
        self.catalog.get_product(id).await.map_err(|e| match e {
            CatalogError::NotFound(msg) => AppError::NotFound(msg),
            e => AppError::Catalog(e),
        })
    }

    /// Add a product to the cart after checking it exists and is in stock.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown products,
    /// [`AppError::BadRequest`] for products out of stock, or an error if the
    /// catalog request fails.
    pub async fn add_to_cart(&mut self, id: ProductId, quantity: Quantity) -> Result<Product> {
        let product = self.product(id).await?;
        if !product.in_stock {
            return Err(AppError::BadRequest(format!(
                "{} is out of stock",
                product.name
            )));
        }
        self.store.add_to_cart(id, quantity);
        Ok(product)
    }

    /// The storefront auth token slot.
    #[must_use]
    pub fn token(&self) -> TokenSlot {
        TokenSlot::new(Arc::clone(&self.storage), TOKEN_KEY)
    }

    /// Store an auth token for subsequent catalog requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn sign_in(&self, token: &SecretString) -> Result<()> {
        self.token().set(token)?;
        info!("Storefront token stored");
        Ok(())
    }

    /// Forget the auth token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn sign_out(&self) -> Result<()> {
        self.token().clear()?;
        info!("Storefront token cleared");
        Ok(())
    }

    /// Whether an auth token is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn is_signed_in(&self) -> Result<bool> {
        Ok(self.token().get()?.is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gigashop_core::MemoryStorage;
    use rust_decimal::Decimal;

    use super::*;
    use crate::persistence::STORAGE_KEY;

    fn state_on(storage: &Arc<dyn KeyValueStore>) -> AppState {
        let config = StorefrontConfig::from_lookup(|_| None).unwrap();
        AppState::with_storage(config, Arc::clone(storage)).unwrap()
    }

    fn product(id: i32, in_stock: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: gigashop_core::Price::new(Decimal::new(999, 2)).unwrap(),
            description: String::new(),
            image: String::new(),
            category: "electronics".to_string(),
            in_stock,
        }
    }

    #[test]
    fn test_mutations_are_persisted_and_rehydrated() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());

        let mut session = state_on(&storage);
        session.store_mut().add_to_favorites(ProductId::new(3));
        session.store_mut().add_to_cart(ProductId::new(2), Quantity::ONE);
        assert!(storage.get(STORAGE_KEY).unwrap().is_some());

        let session = state_on(&storage);
        assert_eq!(session.store().favorites().ids(), &[ProductId::new(3)]);
        assert_eq!(
            session.store().cart().quantity_of(ProductId::new(2)),
            Some(Quantity::ONE)
        );
    }

    #[test]
    fn test_file_backed_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.json");
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "STOREFRONT_STORAGE_PATH").then(|| path.display().to_string())
        })
        .unwrap();

        let mut session = AppState::new(config.clone()).unwrap();
        session.store_mut().toggle_favorite(ProductId::new(8));
        session.store_mut().update_cart_quantity(ProductId::new(8), 4);
        drop(session);

        let session = AppState::new(config).unwrap();
        assert!(session.store().favorites().contains(ProductId::new(8)));
        assert!(session.store().cart().is_empty());
        assert!(path.exists());
    }

    #[test]
    fn test_sign_in_and_out() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
        let session = state_on(&storage);

        assert!(!session.is_signed_in().unwrap());
        session.sign_in(&SecretString::from("abc123")).unwrap();
        assert!(session.is_signed_in().unwrap());
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));

        session.sign_out().unwrap();
        assert!(!session.is_signed_in().unwrap());
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_out_of_stock() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
        let mut session = state_on(&storage);
        session
            .store_mut()
            .set_products(vec![product(1, true), product(2, false)]);

        session
            .add_to_cart(ProductId::new(1), Quantity::ONE)
            .await
            .unwrap();
        let err = session
            .add_to_cart(ProductId::new(2), Quantity::ONE)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(session.store().cart().len(), 1);
    }
}
