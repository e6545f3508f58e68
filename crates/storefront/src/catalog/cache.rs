//! Cache types for catalog API responses.

use std::sync::Arc;

use gigashop_core::{Product, ProductId};

/// Cache key for product data.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Category(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<[Product]>),
    Product(Box<Product>),
}
