//! Newtype ID for type-safe product references.
//!
//! The backend identifies products by opaque strings (`_id` on products,
//! `productId` on cart entries). Wrapping them keeps product ids from being
//! mixed up with other strings such as search text or tokens.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a product in the backend catalog.
///
/// # Example
///
/// ```rust
/// # use qkart_core::ProductId;
/// let id = ProductId::new("BW0jAAeDJmlZCF8i");
/// assert_eq!(id.as_str(), "BW0jAAeDJmlZCF8i");
/// assert!(!id.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is the empty string.
    ///
    /// The backend never issues empty ids, but a cart entry can carry one
    /// and such entries are not counted as cart items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the id and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
