//! GigaShop Storefront library.
//!
//! Client-side storefront state and catalog access:
//!
//! - [`store`] - Cart/favorites store with versioned snapshots
//! - [`persistence`] - Saving and restoring favorites and cart
//! - [`views`] - Display models for the view layer
//! - [`catalog`] - Cached catalog API client
//! - [`state`] - Session state tying the above together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod persistence;
pub mod state;
pub mod store;
pub mod views;
