//! Orders and dashboard figures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gigashop_core::{OrderId, OrderStatus, Price, ProductId, Quantity, UserId};

/// One product line of an order, priced at order time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub price: Price,
}

impl OrderLine {
    /// `price * quantity`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub products: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: NaiveDate,
}

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_users: u64,
    pub total_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}
