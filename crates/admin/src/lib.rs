//! GigaShop Admin library.
//!
//! Admin panel access to the catalog API:
//!
//! - [`client`] - Product CRUD plus dashboard, user and order reads
//! - [`models`] - Admin-side product, user and order types
//! - [`mock`] - Demo data for reads the API does not serve
//!
//! The admin token lives in its own slot (`adminToken`), separate from the
//! storefront's.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod models;

pub use client::AdminApiClient;
