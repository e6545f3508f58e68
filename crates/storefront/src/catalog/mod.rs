//! Catalog API client.
//!
//! Fetches product records over HTTP and normalizes them into [`Product`]s.
//! Product data is cached for 5 minutes and the category list for 10
//! minutes using `moka`. Concurrent misses for the same key each hit the
//! network; nothing is retried or deduplicated.

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use gigashop_core::http::{ApiClient, ApiConfig, ApiError, TokenSlot};
use gigashop_core::{CatalogProduct, Product, ProductId};

use cache::{CacheKey, CacheValue};

const PRODUCT_TTL: Duration = Duration::from_secs(5 * 60);
const CATEGORY_TTL: Duration = Duration::from_secs(10 * 60);
const MAX_CACHE_ENTRIES: u64 = 1000;

/// Errors that can occur when calling the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport, status or decoding failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The catalog has no such resource.
    #[error("Not found: {0}")]
    NotFound(String),
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product catalog API.
///
/// Cheap to clone; clones share the HTTP client and caches.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    api: ApiClient,
    products: Cache<CacheKey, CacheValue>,
    categories: Cache<(), Arc<[String]>>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("api", &self.inner.api)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, token: Option<TokenSlot>) -> Result<Self, CatalogError> {
        Ok(Self::with_api(ApiClient::new(config, token)?))
    }

    /// Wrap an existing API client.
    #[must_use]
    pub fn with_api(api: ApiClient) -> Self {
        let products = Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(PRODUCT_TTL)
            .build();
        let categories = Cache::builder()
            .max_capacity(1)
            .time_to_live(CATEGORY_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                api,
                products,
                categories,
            }),
        }
    }

    /// The underlying API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Arc<[Product]>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.products.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = self.fetch_list("/products").await?;
        self.inner
            .products
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;

        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the catalog has no such product,
    /// or an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.products.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .inner
            .api
            .get_optional_json::<CatalogProduct>(&format!("/products/{id}"))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Product not found: {id}")))?
            .into();

        self.inner
            .products
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the products in `category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn get_products_by_category(
        &self,
        category: &str,
    ) -> Result<Arc<[Product]>, CatalogError> {
        let key = CacheKey::Category(category.to_string());
        if let Some(CacheValue::Products(products)) = self.inner.products.get(&key).await {
            debug!("Cache hit for category");
            return Ok(products);
        }

        let path = format!("/products/category/{}", urlencoding::encode(category));
        let products = self.fetch_list(&path).await?;
        self.inner
            .products
            .insert(key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Get the category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Arc<[String]>, CatalogError> {
        if let Some(categories) = self.inner.categories.get(&()).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<String> = self.inner.api.get_json("/products/categories").await?;
        let categories: Arc<[String]> = categories.into();
        self.inner
            .categories
            .insert((), Arc::clone(&categories))
            .await;

        Ok(categories)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached data.
    pub async fn clear_cache(&self) {
        self.inner.products.invalidate_all();
        self.inner.categories.invalidate_all();
        self.inner.products.run_pending_tasks().await;
        self.inner.categories.run_pending_tasks().await;
    }

    async fn fetch_list(&self, path: &str) -> Result<Arc<[Product]>, CatalogError> {
        let records: Vec<CatalogProduct> = self.inner.api.get_json(path).await?;
        Ok(records.into_iter().map(Product::from).collect())
    }
}
