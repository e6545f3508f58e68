//! Core types for GigaShop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use cart::{CartEntry, Quantity, QuantityError};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::Product;
pub use status::*;
