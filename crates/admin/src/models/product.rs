//! Product types as the admin panel sees them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gigashop_core::{CatalogProduct, Price, Product, ProductId};

/// A catalog product with admin bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image: String,
    pub category: String,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AdminProduct {
    /// Map a catalog record, stamping both timestamps with `at`.
    ///
    /// The catalog keeps no timestamps, so the fetch time stands in.
    #[must_use]
    pub fn from_catalog(item: CatalogProduct, at: DateTime<Utc>) -> Self {
        let Product {
            id,
            name,
            price,
            description,
            image,
            category,
            in_stock,
        } = item.into();

        Self {
            id,
            name,
            price,
            description,
            image,
            category,
            in_stock,
            created_at: Some(at),
            updated_at: Some(at),
        }
    }
}

/// Fields for a product to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "title")]
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image: String,
    pub category: String,
}

impl NewProduct {
    /// Check the fields the catalog cannot do without.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("category must not be empty".to_string());
        }
        Ok(())
    }
}

/// A partial product update. Only fields that are set go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(rename = "title", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ProductPatch {
    /// Whether no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.category.is_none()
    }
}

/// The update the API reports as applied to product `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedPatch {
    pub id: ProductId,
    pub patch: ProductPatch,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_from_catalog_stamps_timestamps() {
        let at = DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let item = CatalogProduct {
            id: ProductId::new(5),
            title: "Bracelet".to_string(),
            price: Price::new(Decimal::new(695, 0)).unwrap(),
            description: "Silver".to_string(),
            image: "https://example.com/5.jpg".to_string(),
            category: "jewelery".to_string(),
        };

        let product = AdminProduct::from_catalog(item, at);
        assert_eq!(product.name, "Bracelet");
        assert!(product.in_stock);
        assert_eq!(product.created_at, Some(at));
        assert_eq!(product.updated_at, Some(at));
    }

    #[test]
    fn test_new_product_wire_names() {
        let product = NewProduct {
            name: "Lamp".to_string(),
            price: Price::new(Decimal::new(1999, 2)).unwrap(),
            description: "Desk lamp".to_string(),
            image: "https://example.com/lamp.jpg".to_string(),
            category: "electronics".to_string(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["title"], "Lamp");
        assert_eq!(json["price"], 19.99);
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_new_product_validate() {
        let mut product = NewProduct {
            name: "  ".to_string(),
            price: Price::new(Decimal::ONE).unwrap(),
            description: String::new(),
            image: String::new(),
            category: "misc".to_string(),
        };
        assert!(product.validate().is_err());

        product.name = "Mug".to_string();
        assert!(product.validate().is_ok());

        product.category = String::new();
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ProductPatch {
            price: Some(Price::new(Decimal::new(25, 0)).unwrap()),
            name: Some("Renamed".to_string()),
            ..ProductPatch::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"title": "Renamed", "price": 25.0})
        );
        assert!(ProductPatch::default().is_empty());
    }

    #[test]
    fn test_patch_reads_echoed_body() {
        let patch: ProductPatch =
            serde_json::from_str(r#"{"id": 7, "title": "Renamed", "price": "13.5"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Renamed"));
        assert_eq!(patch.price.unwrap().amount(), Decimal::new(135, 1));
        assert!(patch.description.is_none());
    }
}
