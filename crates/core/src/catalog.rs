//! Catalog API wire types.
//!
//! The catalog speaks `{id, title, price, description, image, category}`;
//! the rest of the workspace speaks [`Product`]. Conversion lives here so the
//! storefront and admin clients map responses identically.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// A product exactly as the catalog API returns it.
///
/// Unknown fields (such as `rating`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
}

impl From<CatalogProduct> for Product {
    fn from(item: CatalogProduct) -> Self {
        Self {
            id: item.id,
            name: item.title,
            price: item.price,
            description: item.description,
            image: item.image,
            category: item.category,
            // The catalog has no stock concept.
            in_stock: true,
        }
    }
}

impl From<Product> for CatalogProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.name,
            price: product.price,
            description: product.description,
            image: product.image,
            category: product.category,
        }
    }
}
