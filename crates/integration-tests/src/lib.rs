//! Integration tests for GigaShop.
//!
//! The storefront and admin clients are exercised over real HTTP against
//! [`FakeCatalog`], an in-process server speaking the catalog API's wire
//! format. No network access is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gigashop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Catalog reads, mapping and caching
//! - `storefront_session` - Tokens, 401 handling and persisted sessions
//! - `admin_api` - Admin product CRUD and the admin token

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Id the fake assigns to created products.
pub const CREATED_ID: i32 = 21;

/// One request as the fake saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path as sent, still percent-encoded.
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct FakeState {
    products: Vec<Value>,
    requests: Mutex<Vec<RecordedRequest>>,
    bodies: Mutex<Vec<Value>>,
    reject_all: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process catalog API bound to an ephemeral localhost port.
///
/// The server task is aborted when the fake is dropped.
pub struct FakeCatalog {
    base_url: Url,
    state: Arc<FakeState>,
    server: JoinHandle<()>,
}

impl FakeCatalog {
    /// Start a fake serving [`sample_products`].
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::with_products(sample_products()).await
    }

    /// Start a fake serving `products` (catalog wire format).
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn with_products(products: Vec<Value>) -> std::io::Result<Self> {
        let state = Arc::new(FakeState {
            products,
            ..FakeState::default()
        });

        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route("/products/categories", get(list_categories))
            .route("/products/category/{category}", get(list_category))
            .route(
                "/products/{id}",
                get(show_product).put(update_product).delete(delete_product),
            )
            .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Ok(Self {
            base_url,
            state,
            server,
        })
    }

    /// Base URL to point clients at.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Number of requests received for exactly `path`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        lock(&self.state.requests)
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    /// JSON bodies of POST and PUT requests, oldest first.
    #[must_use]
    pub fn bodies(&self) -> Vec<Value> {
        lock(&self.state.bodies).clone()
    }

    /// Answer every following request with 401.
    pub fn reject_all(&self, reject: bool) {
        self.state.reject_all.store(reject, Ordering::SeqCst);
    }
}

impl Drop for FakeCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Six products across three categories, in catalog wire format.
#[must_use]
pub fn sample_products() -> Vec<Value> {
    vec![
        json!({"id": 1, "title": "Fjallraven - Foldsack No. 1 Backpack", "price": 109.95,
               "description": "Your perfect pack for everyday use", "category": "men's clothing",
               "image": "https://example.com/1.jpg", "rating": {"rate": 3.9, "count": 120}}),
        json!({"id": 2, "title": "Mens Casual Premium Slim Fit T-Shirts", "price": 22.3,
               "description": "Slim-fitting style", "category": "men's clothing",
               "image": "https://example.com/2.jpg"}),
        json!({"id": 5, "title": "Silver Dragon Station Chain Bracelet", "price": 695,
               "description": "From our Legends Collection", "category": "jewelery",
               "image": "https://example.com/5.jpg"}),
        json!({"id": 9, "title": "WD 2TB Elements Portable External Hard Drive", "price": 64,
               "description": "USB 3.0 and USB 2.0 compatibility", "category": "electronics",
               "image": "https://example.com/9.jpg"}),
        json!({"id": 10, "title": "SanDisk SSD PLUS 1TB Internal SSD", "price": "109",
               "description": "Easy upgrade for faster boot up", "category": "electronics",
               "image": "https://example.com/10.jpg"}),
        json!({"id": 14, "title": "Samsung 49-Inch Curved Gaming Monitor", "price": 999.99,
               "description": "49 inch super ultrawide", "category": "electronics",
               "image": "https://example.com/14.jpg"}),
    ]
}

// =============================================================================
// Handlers
// =============================================================================

async fn record(State(state): State<Arc<FakeState>>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    lock(&state.requests).push(RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization,
    });

    if state.reject_all.load(Ordering::SeqCst) {
        return (StatusCode::UNAUTHORIZED, "invalid token").into_response();
    }
    next.run(request).await
}

async fn list_products(State(state): State<Arc<FakeState>>) -> Json<Vec<Value>> {
    Json(state.products.clone())
}

async fn list_categories(State(state): State<Arc<FakeState>>) -> Json<Vec<String>> {
    let mut categories: Vec<String> = Vec::new();
    for category in state.products.iter().filter_map(|p| p["category"].as_str()) {
        if !categories.iter().any(|c| c == category) {
            categories.push(category.to_string());
        }
    }
    Json(categories)
}

async fn list_category(
    State(state): State<Arc<FakeState>>,
    Path(category): Path<String>,
) -> Json<Vec<Value>> {
    Json(
        state
            .products
            .iter()
            .filter(|p| p["category"] == category.as_str())
            .cloned()
            .collect(),
    )
}

fn find(state: &FakeState, id: i64) -> Option<Value> {
    state
        .products
        .iter()
        .find(|p| p["id"].as_i64() == Some(id))
        .cloned()
}

/// Unknown ids get a 200 with an empty body, as the real catalog does.
async fn show_product(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> Response {
    find(&state, id).map_or_else(|| String::new().into_response(), |p| Json(p).into_response())
}

async fn create_product(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    lock(&state.bodies).push(body.clone());
    Json(with_id(body, i64::from(CREATED_ID)))
}

async fn update_product(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    lock(&state.bodies).push(body.clone());
    Json(with_id(body, id))
}

async fn delete_product(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> Response {
    find(&state, id).map_or_else(|| String::new().into_response(), |p| Json(p).into_response())
}

fn with_id(body: Value, id: i64) -> Value {
    match body {
        Value::Object(mut fields) => {
            fields.insert("id".to_string(), json!(id));
            Value::Object(fields)
        }
        other => other,
    }
}
