//! Admin API client.
//!
//! Product CRUD passes straight through to the catalog API. Dashboard stats,
//! users and orders have no backing endpoint and are served from [`mock`].
//!
//! [`mock`]: crate::mock

use std::sync::Arc;

use chrono::Utc;
use secrecy::SecretString;
use tracing::{debug, info, instrument};

use gigashop_core::http::{ApiClient, TokenSlot};
use gigashop_core::{CatalogProduct, KeyValueStore, ProductId};

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::mock;
use crate::models::{
    AdminProduct, AppliedPatch, DashboardStats, NewProduct, Order, ProductPatch, User,
};

/// Storage key of the admin auth token.
pub const TOKEN_KEY: &str = "adminToken";

/// Client for the admin panel's API calls.
///
/// Cheap to clone; clones share the HTTP client and token slot.
#[derive(Debug, Clone)]
pub struct AdminApiClient {
    api: ApiClient,
}

impl AdminApiClient {
    /// Create a client whose token lives in `storage` under [`TOKEN_KEY`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &AdminConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let token = TokenSlot::new(storage, TOKEN_KEY);
        let api = ApiClient::new(&config.api_config(), Some(token))?;
        Ok(Self { api })
    }

    /// The underlying API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Store an admin token for subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn sign_in(&self, token: &SecretString) -> Result<()> {
        if let Some(slot) = self.api.token_slot() {
            slot.set(token)?;
            info!("Admin token stored");
        }
        Ok(())
    }

    /// Forget the admin token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn sign_out(&self) -> Result<()> {
        if let Some(slot) = self.api.token_slot() {
            slot.clear()?;
            info!("Admin token cleared");
        }
        Ok(())
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Headline dashboard figures.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible to match the other reads.
    #[allow(clippy::unused_async)]
    #[instrument(skip(self))]
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        Ok(mock::dashboard_stats())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Every product, stamped with the fetch time.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<AdminProduct>> {
        let records: Vec<CatalogProduct> = self.api.get_json("/products").await?;
        let now = Utc::now();
        debug!(count = records.len(), "Fetched admin products");
        Ok(records
            .into_iter()
            .map(|item| AdminProduct::from_catalog(item, now))
            .collect())
    }

    /// One product, stamped with the fetch time.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the API has no such product, or an
    /// error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<AdminProduct> {
        let item: CatalogProduct = self
            .api
            .get_optional_json(&format!("/products/{id}"))
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("Product not found: {id}")))?;
        Ok(AdminProduct::from_catalog(item, Utc::now()))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] if `product` is incomplete, or an
    /// error if the API request fails.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<AdminProduct> {
        product.validate().map_err(AdminError::Validation)?;
        let created: CatalogProduct = self.api.post_json("/products", product).await?;
        info!(product_id = %created.id, "Product created");
        Ok(AdminProduct::from_catalog(created, Utc::now()))
    }

    /// Update the set fields of a product.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] for an empty patch, or an error if
    /// the API request fails.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<AppliedPatch> {
        if patch.is_empty() {
            return Err(AdminError::Validation("nothing to update".to_string()));
        }
        if let Some(name) = &patch.name
            && name.trim().is_empty()
        {
            return Err(AdminError::Validation("name must not be empty".to_string()));
        }

        let echoed: ProductPatch = self
            .api
            .put_json(&format!("/products/{id}"), patch)
            .await?;
        info!("Product updated");
        Ok(AppliedPatch { id, patch: echoed })
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.api.delete(&format!("/products/{id}")).await?;
        info!("Product deleted");
        Ok(())
    }

    // =========================================================================
    // Users and orders
    // =========================================================================

    /// Shop users.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible to match the other reads.
    #[allow(clippy::unused_async)]
    #[instrument(skip(self))]
    pub async fn get_users(&self) -> Result<Vec<User>> {
        Ok(mock::users())
    }

    /// Placed orders.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible to match the other reads.
    #[allow(clippy::unused_async)]
    #[instrument(skip(self))]
    pub async fn get_orders(&self) -> Result<Vec<Order>> {
        Ok(mock::orders())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gigashop_core::{MemoryStorage, Price};
    use rust_decimal::Decimal;

    use super::*;

    fn client(storage: &Arc<MemoryStorage>) -> AdminApiClient {
        let config = AdminConfig::from_lookup(|_| None).unwrap();
        AdminApiClient::new(&config, Arc::clone(storage) as Arc<dyn KeyValueStore>).unwrap()
    }

    #[test]
    fn test_sign_in_uses_admin_slot() {
        let storage = Arc::new(MemoryStorage::new());
        let client = client(&storage);

        client.sign_in(&SecretString::from("root-token")).unwrap();
        assert_eq!(
            storage.get(TOKEN_KEY).unwrap().as_deref(),
            Some("root-token")
        );
        assert_eq!(storage.get("token").unwrap(), None);

        client.sign_out().unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_reads() {
        let client = client(&Arc::new(MemoryStorage::new()));
        assert_eq!(client.get_dashboard_stats().await.unwrap().total_orders, 567);
        assert_eq!(client.get_users().await.unwrap().len(), 2);
        assert_eq!(
            client.get_orders().await.unwrap()[0].total,
            Decimal::new(5998, 2)
        );
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name_before_request() {
        let client = client(&Arc::new(MemoryStorage::new()));
        let product = NewProduct {
            name: String::new(),
            price: Price::new(Decimal::ONE).unwrap(),
            description: String::new(),
            image: String::new(),
            category: "misc".to_string(),
        };
        let err = client.create_product(&product).await.unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_empty_patch_before_request() {
        let client = client(&Arc::new(MemoryStorage::new()));
        let err = client
            .update_product(ProductId::new(1), &ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
    }
}
