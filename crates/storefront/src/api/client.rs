//! `reqwest` implementation of the backend API.

use std::sync::Arc;

use qkart_core::{CartEntry, Product, ProductId};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, StoreApi};
use crate::config::ApiConfig;
use crate::storage::AuthToken;

/// Body of a 400 response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Body of `POST /cart`.
#[derive(Debug, Serialize)]
struct CartUpdateBody<'a> {
    #[serde(rename = "productId")]
    product_id: &'a ProductId,
    qty: u32,
}

/// Client for the QKart backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend
    /// initialization failure).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                config: config.clone(),
            }),
        })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.config.endpoint
    }

    fn search_url(&self, text: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("value", text)
            .finish();
        format!("{}?{query}", self.inner.config.url("products/search"))
    }

    /// Send a request and parse a successful JSON body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &response_text));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::MalformedResponse(e)
        })
    }
}

/// Map a non-success status and its body to an error.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::BAD_REQUEST => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .map_or_else(|_| body.trim().to_string(), |b| b.message);
            ApiError::BadRequest(message)
        }
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        _ => {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            ApiError::Status(status)
        }
    }
}

impl StoreApi for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let request = self.inner.client.get(self.inner.config.url("products"));
        let products: Vec<Product> = self.execute(request).await?;
        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn search_products(&self, text: &str) -> Result<Vec<Product>, ApiError> {
        let request = self.inner.client.get(self.search_url(text));
        let products: Vec<Product> = self.execute(request).await?;
        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    #[instrument(skip(self, token))]
    async fn fetch_cart(&self, token: &AuthToken) -> Result<Vec<CartEntry>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.inner.config.url("cart"))
            .header(reqwest::header::AUTHORIZATION, token.bearer());
        let entries: Vec<CartEntry> = self.execute(request).await?;
        debug!(count = entries.len(), "Fetched cart");
        Ok(entries)
    }

    #[instrument(skip(self, token))]
    async fn update_cart(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<CartEntry>, ApiError> {
        let request = self
            .inner
            .client
            .post(self.inner.config.url("cart"))
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .json(&CartUpdateBody {
                product_id,
                qty: quantity,
            });
        let entries: Vec<CartEntry> = self.execute(request).await?;
        debug!(count = entries.len(), "Cart updated");
        Ok(entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&ApiConfig::new("http://localhost:8082/api/v1").unwrap()).unwrap()
    }

    #[test]
    fn test_status_error_bad_request_uses_message() {
        let err = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"code": 400, "message": "Product doesn't exist"}"#,
        );
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Product doesn't exist"));
    }

    #[test]
    fn test_status_error_bad_request_falls_back_to_body() {
        let err = status_error(StatusCode::BAD_REQUEST, "  plain text  ");
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "plain text"));
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, ""),
            ApiError::Status(StatusCode::BAD_GATEWAY)
        ));
    }

    #[test]
    fn test_search_url_encodes_text() {
        let url = client().search_url("red shoes & bags");
        assert_eq!(
            url,
            "http://localhost:8082/api/v1/products/search?value=red+shoes+%26+bags"
        );
    }

    #[test]
    fn test_cart_update_body_shape() {
        let id = ProductId::new("p1");
        let body = serde_json::to_value(CartUpdateBody {
            product_id: &id,
            qty: 3,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"productId": "p1", "qty": 3}));
    }
}
