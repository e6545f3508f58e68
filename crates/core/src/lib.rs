//! GigaShop Core - Shared types library.
//!
//! This crate provides common types used across all GigaShop components:
//! - `storefront` - Product listings, cart and favorites
//! - `admin` - Catalog administration and dashboards
//! - `cli` - Command-line front end for both
//!
//! # Architecture
//!
//! The core crate holds types, the local key-value storage backends, and
//! (behind the `http` feature) the HTTP client shared by the catalog and
//! admin clients. It has no knowledge of the cart/favorites store itself.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities and statuses
//! - [`catalog`] - Wire shape of catalog API products and its mapping
//! - [`storage`] - String key-value persistence backends
//! - `http` - Bearer-token aware JSON client (feature `http`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
#[cfg(feature = "http")]
pub mod http;
pub mod storage;
pub mod types;

pub use catalog::CatalogProduct;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use types::*;
