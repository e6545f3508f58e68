//! Integration tests for storefront sessions.
//!
//! A session owns the token slot, the catalog client and the persisted
//! cart/favorites store. These tests drive it the way a front end would.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;

use gigashop_core::http::ApiError;
use gigashop_core::{KeyValueStore, MemoryStorage, ProductId, Quantity};
use gigashop_integration_tests::FakeCatalog;
use gigashop_storefront::catalog::CatalogError;
use gigashop_storefront::config::StorefrontConfig;
use gigashop_storefront::error::AppError;
use gigashop_storefront::persistence::STORAGE_KEY;
use gigashop_storefront::state::{AppState, TOKEN_KEY};
use gigashop_storefront::views::CartView;

fn config(fake: &FakeCatalog, storage_path: Option<&std::path::Path>) -> StorefrontConfig {
    let url = fake.base_url().to_string();
    let path = storage_path.map(|p| p.display().to_string());
    StorefrontConfig::from_lookup(move |key| match key {
        "CATALOG_API_URL" => Some(url.clone()),
        "STOREFRONT_STORAGE_PATH" => path.clone(),
        _ => None,
    })
    .unwrap()
}

fn session(fake: &FakeCatalog, storage: &Arc<dyn KeyValueStore>) -> AppState {
    AppState::with_storage(config(fake, None), Arc::clone(storage)).unwrap()
}

// =============================================================================
// Token handling
// =============================================================================

#[tokio::test]
async fn test_stored_token_is_sent_as_bearer() {
    let fake = FakeCatalog::start().await.unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
    let mut state = session(&fake, &storage);

    state.sign_in(&SecretString::from("abc123")).unwrap();
    state.refresh_products().await.unwrap();

    let request = fake.requests().pop().unwrap();
    assert_eq!(request.authorization.as_deref(), Some("Bearer abc123"));
}

#[tokio::test]
async fn test_unauthorized_clears_token() {
    let fake = FakeCatalog::start().await.unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
    let mut state = session(&fake, &storage);
    state.sign_in(&SecretString::from("expired")).unwrap();

    fake.reject_all(true);
    let err = state.refresh_products().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Catalog(CatalogError::Api(ApiError::Unauthorized { ref login_route }))
            if login_route == "/login"
    ));
    assert!(!state.is_signed_in().unwrap());
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_sign_out_stops_sending_token() {
    let fake = FakeCatalog::start().await.unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
    let state = session(&fake, &storage);

    state.sign_in(&SecretString::from("abc123")).unwrap();
    state.sign_out().unwrap();
    state.catalog().get_categories().await.unwrap();

    assert!(fake.requests().pop().unwrap().authorization.is_none());
}

// =============================================================================
// Cart and favorites
// =============================================================================

#[tokio::test]
async fn test_shopping_flow() {
    let fake = FakeCatalog::start().await.unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
    let mut state = session(&fake, &storage);

    state.refresh_products().await.unwrap();
    state.store_mut().toggle_favorite(ProductId::new(2));
    state
        .add_to_cart(ProductId::new(1), Quantity::new(2).unwrap())
        .await
        .unwrap();
    state
        .add_to_cart(ProductId::new(2), Quantity::ONE)
        .await
        .unwrap();
    state.store_mut().update_cart_quantity(ProductId::new(2), 3);

    let cart = CartView::from(state.store().state());
    assert_eq!(cart.item_count, 5);
    // 2 x 109.95 + 3 x 22.30
    assert_eq!(cart.subtotal, "$286.80");

    state.store_mut().update_cart_quantity(ProductId::new(1), 0);
    let cart = CartView::from(state.store().state());
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.subtotal, "$66.90");
}

#[tokio::test]
async fn test_add_unknown_product_to_cart() {
    let fake = FakeCatalog::start().await.unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
    let mut state = session(&fake, &storage);

    let err = state
        .add_to_cart(ProductId::new(404), Quantity::ONE)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert!(state.store().cart().is_empty());
    assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_session_survives_restart() {
    let fake = FakeCatalog::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storefront.json");

    let mut state = AppState::new(config(&fake, Some(&path))).unwrap();
    state.sign_in(&SecretString::from("abc123")).unwrap();
    state.store_mut().add_to_favorites(ProductId::new(9));
    state
        .add_to_cart(ProductId::new(14), Quantity::ONE)
        .await
        .unwrap();
    drop(state);

    let mut state = AppState::new(config(&fake, Some(&path))).unwrap();
    assert!(state.is_signed_in().unwrap());
    assert!(state.store().favorites().contains(ProductId::new(9)));
    assert_eq!(
        state.store().cart().quantity_of(ProductId::new(14)),
        Some(Quantity::ONE)
    );

    // The listing is not persisted; it comes back from the catalog.
    assert!(state.store().products().is_empty());
    state.refresh_products().await.unwrap();
    assert_eq!(state.store().products().len(), 6);
}
