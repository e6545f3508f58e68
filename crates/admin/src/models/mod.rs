//! Domain models for admin.

pub mod order;
pub mod product;
pub mod user;

pub use order::{DashboardStats, Order, OrderLine};
pub use product::{AdminProduct, AppliedPatch, NewProduct, ProductPatch};
pub use user::User;
