//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{Cost, ProductId, Rating};

/// A product available to buy.
///
/// Field names follow the backend's JSON (`_id`, `image`). Every field is
/// required; a record missing any of them is rejected at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique ID for the product.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// The name or title of the product.
    pub name: String,
    /// The category that the product belongs to.
    pub category: String,
    /// The price to buy one unit.
    pub cost: Cost,
    /// Aggregate rating out of five.
    pub rating: Rating,
    /// URL of the product image.
    #[serde(rename = "image")]
    pub image_url: String,
}
