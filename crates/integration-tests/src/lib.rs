//! Test support for the QKart storefront client.
//!
//! [`MockBackend`] is an axum server on an ephemeral port that implements
//! the four REST endpoints the client talks to, with in-memory products and
//! a single cart guarded by a fixed bearer token.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p qkart-integration-tests
//! ```
//!
//! # Routes
//!
//! ```text
//! GET  /api/v1/products                 - Full catalog
//! GET  /api/v1/products/search?value=.. - Name/category match, 404 when empty
//! GET  /api/v1/cart                     - Cart entries (Bearer)
//! POST /api/v1/cart                     - Set {productId, qty} (Bearer)
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use qkart_core::{CartEntry, Product, ProductId};
use qkart_storefront::config::ApiConfig;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// The only token the mock backend accepts.
pub const TOKEN: &str = "test-token";

/// Base path of the REST API.
const API_PREFIX: &str = "/api/v1";

/// Endpoint a request was routed to, for hit counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Products,
    Search,
    FetchCart,
    UpdateCart,
}

#[derive(Default)]
struct BackendData {
    products: Vec<Product>,
    cart: Vec<CartEntry>,
    hits: HashMap<Route, usize>,
    malformed_products: bool,
    products_status: Option<StatusCode>,
}

#[derive(Clone, Default)]
struct BackendState {
    data: Arc<Mutex<BackendData>>,
}

impl BackendState {
    fn lock(&self) -> MutexGuard<'_, BackendData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hit(&self, route: Route) -> MutexGuard<'_, BackendData> {
        let mut data = self.lock();
        *data.hits.entry(route).or_default() += 1;
        data
    }
}

/// In-process stand-in for the QKart backend.
pub struct MockBackend {
    addr: SocketAddr,
    state: BackendState,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start serving `products` with an empty cart.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(products: Vec<Product>) -> Self {
        let state = BackendState::default();
        state.lock().products = products;

        let api = Router::new()
            .route("/products", get(list_products))
            .route("/products/search", get(search_products))
            .route("/cart", get(fetch_cart).post(update_cart));
        let app = Router::new()
            .nest(API_PREFIX, api)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL the client should be configured with.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("http://{}{API_PREFIX}", self.addr)
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Never in practice; the endpoint is always a valid http URL.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.endpoint()).expect("Mock endpoint is a valid URL")
    }

    /// Replace the stored cart.
    pub fn set_cart(&self, cart: Vec<CartEntry>) {
        self.state.lock().cart = cart;
    }

    /// Current stored cart.
    #[must_use]
    pub fn cart(&self) -> Vec<CartEntry> {
        self.state.lock().cart.clone()
    }

    /// Remove a product from the catalog, leaving cart entries that reference it.
    pub fn remove_product(&self, id: &ProductId) {
        self.state.lock().products.retain(|p| &p.id != id);
    }

    /// Serve a body that is not a product list from `GET /products`.
    pub fn serve_malformed_products(&self) {
        self.state.lock().malformed_products = true;
    }

    /// Answer `GET /products` with `status` instead of the catalog.
    pub fn fail_products_with(&self, status: StatusCode) {
        self.state.lock().products_status = Some(status);
    }

    /// Number of requests routed to `route` so far.
    #[must_use]
    pub fn hits(&self, route: Route) -> usize {
        self.state.lock().hits.get(&route).copied().unwrap_or_default()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(state): State<BackendState>) -> Response {
    let data = state.hit(Route::Products);
    if let Some(status) = data.products_status {
        return (status, Json(json!({ "message": "Catalog unavailable" }))).into_response();
    }
    if data.malformed_products {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }
    Json(data.products.clone()).into_response()
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    value: String,
}

async fn search_products(
    State(state): State<BackendState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let data = state.hit(Route::Search);
    let needle = query.value.to_lowercase();
    let matches: Vec<Product> = data
        .products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.category.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        (StatusCode::NOT_FOUND, Json(json!([]))).into_response()
    } else {
        Json(matches).into_response()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Please authenticate" })),
    )
        .into_response()
}

async fn fetch_cart(State(state): State<BackendState>, headers: HeaderMap) -> Response {
    let data = state.hit(Route::FetchCart);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(data.cart.clone()).into_response()
}

async fn update_cart(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Json(update): Json<CartEntry>,
) -> Response {
    let mut data = state.hit(Route::UpdateCart);
    if !authorized(&headers) {
        return unauthorized();
    }
    if !data.products.iter().any(|p| p.id == update.product_id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Product doesn't exist" })),
        )
            .into_response();
    }

    if update.quantity == 0 {
        data.cart.retain(|entry| entry.product_id != update.product_id);
    } else if let Some(entry) = data
        .cart
        .iter_mut()
        .find(|entry| entry.product_id == update.product_id)
    {
        entry.quantity = update.quantity;
    } else {
        data.cart.push(update);
    }

    Json(data.cart.clone()).into_response()
}
