//! Controller-level error taxonomy.
//!
//! Every [`StoreError`] has already been reported to the user through a
//! notification by the time the caller sees it. Callers use the value only to
//! decide what to do next (exit status, tests), never to inform the user again.

use qkart_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;

/// Shown when a cart operation is attempted without a token.
pub const LOGIN_REQUIRED: &str = "Login to add an item to the Cart";

/// Shown when a product card tries to add something already in the cart.
pub const ALREADY_IN_CART: &str =
    "Item already in cart. Use the cart sidebar to update quantity or remove item.";

/// Shown after a successful cart mutation.
pub const CART_UPDATED: &str = "Your cart has been successfully updated.";

/// Shown when the catalog or search cannot be loaded.
pub const CATALOG_UNAVAILABLE: &str =
    "Something went wrong. Check that the backend is running, reachable and returns valid JSON.";

/// Shown when the cart cannot be loaded.
pub const CART_UNAVAILABLE: &str =
    "Could not fetch cart details. Check that the backend is running, reachable and returns valid JSON.";

/// Shown when a cart mutation fails for any reason other than a 400.
pub const BACKEND_UNREACHABLE: &str =
    "Could not connect to the backend. Kindly try after sometimes.";

/// Why a controller operation did not change state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No auth token in client storage.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// The product is already in the cart and duplicates were disallowed.
    #[error("Product {0} is already in the cart")]
    DuplicateRejected(ProductId),

    /// The backend rejected the request; the message is the server's own.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Any other backend or transport failure.
    #[error("Connectivity error: {0}")]
    Connectivity(#[source] ApiError),
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::BadRequest(message) => Self::BadRequest(message),
            other => Self::Connectivity(other),
        }
    }
}

impl StoreError {
    /// Message to show the user, using `fallback` for connectivity failures.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Unauthenticated => LOGIN_REQUIRED.to_string(),
            Self::DuplicateRejected(_) => ALREADY_IN_CART.to_string(),
            Self::BadRequest(message) => message.clone(),
            Self::Connectivity(_) => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_error() {
        let err = StoreError::from(ApiError::BadRequest("Product doesn't exist".to_string()));
        assert!(matches!(err, StoreError::BadRequest(ref m) if m == "Product doesn't exist"));

        let err = StoreError::from(ApiError::NotFound);
        assert!(matches!(err, StoreError::Connectivity(ApiError::NotFound)));
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            StoreError::Unauthenticated.user_message(BACKEND_UNREACHABLE),
            LOGIN_REQUIRED
        );
        assert_eq!(
            StoreError::DuplicateRejected(ProductId::new("p1")).user_message(BACKEND_UNREACHABLE),
            ALREADY_IN_CART
        );
        assert_eq!(
            StoreError::BadRequest("Out of stock".to_string()).user_message(BACKEND_UNREACHABLE),
            "Out of stock"
        );
        assert_eq!(
            StoreError::Connectivity(ApiError::Unauthorized).user_message(CART_UNAVAILABLE),
            CART_UNAVAILABLE
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(StoreError::Unauthenticated.to_string(), "Unauthenticated");
        assert_eq!(
            StoreError::DuplicateRejected(ProductId::new("p1")).to_string(),
            "Product p1 is already in the cart"
        );
    }
}
