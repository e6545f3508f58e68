//! Fixed demo data for the admin endpoints the catalog API lacks.

use std::num::NonZeroU32;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use gigashop_core::{OrderId, OrderStatus, Price, ProductId, Quantity, UserId, UserRole};

use crate::models::{DashboardStats, Order, OrderLine, User};

const ORDER_QUANTITY: Quantity = Quantity::ONE.saturating_add(Quantity::ONE);

const ORDER_LINE_PRICE: Price = match NonZeroU32::new(2999) {
    Some(cents) => Price::from_cents(cents),
    None => panic!("line price is non-zero"),
};

/// Evaluated in constants, so an invalid date fails the build.
const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid demo date"),
    }
}

const JOHN_CREATED: NaiveDate = date(2025, 1, 1);
const JANE_CREATED: NaiveDate = date(2025, 1, 2);
const ORDER_CREATED: NaiveDate = date(2025, 1, 15);

/// Dashboard headline figures.
#[must_use]
pub fn dashboard_stats() -> DashboardStats {
    DashboardStats {
        total_products: 1234,
        total_users: 8901,
        total_orders: 567,
        revenue: Decimal::new(45_200, 0),
    }
}

/// Two demo accounts: a customer and an admin.
#[must_use]
pub fn users() -> Vec<User> {
    vec![
        User {
            id: UserId::new(1),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: UserRole::Customer,
            created_at: JOHN_CREATED,
            is_active: true,
        },
        User {
            id: UserId::new(2),
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            role: UserRole::Admin,
            created_at: JANE_CREATED,
            is_active: true,
        },
    ]
}

/// One completed demo order.
#[must_use]
pub fn orders() -> Vec<Order> {
    let line = OrderLine {
        product_id: ProductId::new(1),
        quantity: ORDER_QUANTITY,
        price: ORDER_LINE_PRICE,
    };

    vec![Order {
        id: OrderId::new(1),
        user_id: UserId::new(1),
        total: line.total(),
        products: vec![line],
        status: OrderStatus::Completed,
        created_at: ORDER_CREATED,
    }]
}
