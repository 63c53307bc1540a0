//! QKart backend REST API.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`
//! - Responses are parsed into typed records at this boundary; malformed
//!   bodies surface as [`ApiError::MalformedResponse`] instead of leaking
//!   partially-populated data into controller state
//! - Cart endpoints authenticate with a bearer token from client storage
//!
//! # Endpoints
//!
//! - `GET  {endpoint}/products` - full catalog
//! - `GET  {endpoint}/products/search?value={text}` - search (404 = no results)
//! - `GET  {endpoint}/cart` - current user's cart
//! - `POST {endpoint}/cart` - set a product's quantity, returns the updated cart
//!
//! # Example
//!
//! ```rust,ignore
//! use qkart_storefront::api::{ApiClient, StoreApi};
//!
//! let client = ApiClient::new(&config.api)?;
//! let products = client.fetch_products().await?;
//! let cart = client.update_cart(&token, &products[0].id, 2).await?;
//! ```

mod client;

pub use client::ApiClient;

use std::future::Future;

use qkart_core::{CartEntry, Product, ProductId};
use reqwest::StatusCode;
use thiserror::Error;

use crate::storage::AuthToken;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the request (HTTP 400) with a message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The requested resource does not exist (HTTP 404).
    #[error("Not found")]
    NotFound,

    /// The bearer token was missing, expired or invalid (HTTP 401/403).
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-success status.
    #[error("Unexpected status: {0}")]
    Status(StatusCode),

    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this is a client error whose message should be shown verbatim.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }
}

/// The backend operations the storefront controller depends on.
///
/// Implemented by [`ApiClient`] for the real backend; tests substitute
/// in-memory fakes.
pub trait StoreApi: Send + Sync + 'static {
    /// Fetch the full product catalog.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Search the catalog by name or category.
    fn search_products(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Fetch the authenticated user's cart.
    fn fetch_cart(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<Vec<CartEntry>, ApiError>> + Send;

    /// Set the quantity of a product in the cart and return the updated cart.
    ///
    /// `quantity` is absolute, not a delta; zero removes the product.
    fn update_cart(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<Vec<CartEntry>, ApiError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::BadRequest("Product doesn't exist".to_string());
        assert_eq!(err.to_string(), "Bad request: Product doesn't exist");
        assert!(err.is_bad_request());

        let err = ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Unexpected status: 500 Internal Server Error"
        );
        assert!(!err.is_bad_request());
    }

    #[test]
    fn test_api_error_from_serde() {
        let parse_err = serde_json::from_str::<Vec<Product>>("{").unwrap_err();
        let err = ApiError::from(parse_err);
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }
}
