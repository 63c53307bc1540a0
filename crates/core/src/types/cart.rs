//! Cart entry and line item types.

use serde::{Deserialize, Serialize};

use super::{Cost, Product, ProductId};

/// One row of the server-held cart.
///
/// The backend is the source of truth; the client re-reads or replaces the
/// whole set of entries after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product this entry refers to.
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    /// Number of units in the cart.
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartEntry {
    /// Create a new cart entry.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A cart entry enriched with product display fields.
///
/// Derived from a [`CartEntry`] and the catalog, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartLineItem {
    /// The catalog has a product with the entry's id.
    Matched {
        /// Full product record.
        product: Product,
        /// Number of units in the cart.
        quantity: u32,
    },
    /// No product in the catalog has the entry's id, e.g. it was removed
    /// server-side after being added to the cart.
    Orphaned {
        /// Id carried by the cart entry.
        product_id: ProductId,
        /// Number of units in the cart.
        quantity: u32,
    },
}

impl CartLineItem {
    /// Product id of the underlying cart entry.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        match self {
            Self::Matched { product, .. } => &product.id,
            Self::Orphaned { product_id, .. } => product_id,
        }
    }

    /// Number of units in the cart.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        match self {
            Self::Matched { quantity, .. } | Self::Orphaned { quantity, .. } => *quantity,
        }
    }

    /// Matched product, if any.
    #[must_use]
    pub const fn product(&self) -> Option<&Product> {
        match self {
            Self::Matched { product, .. } => Some(product),
            Self::Orphaned { .. } => None,
        }
    }

    /// Unit cost, unknown for orphaned lines.
    #[must_use]
    pub fn cost(&self) -> Option<Cost> {
        self.product().map(|product| product.cost)
    }

    /// Whether the line refers to a product missing from the catalog.
    #[must_use]
    pub const fn is_orphaned(&self) -> bool {
        matches!(self, Self::Orphaned { .. })
    }
}
