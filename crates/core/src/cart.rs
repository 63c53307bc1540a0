//! Cart reconciliation and totals.
//!
//! The backend stores a cart as bare `{productId, qty}` pairs. Everything the
//! cart panel shows (names, images, prices, totals) comes from merging those
//! pairs with the product catalog here. All functions are pure.

use rust_decimal::Decimal;

use crate::types::{CartEntry, CartLineItem, Product, ProductId};

/// Build display line items from the server cart and the product catalog.
///
/// Produces exactly one line per entry, in entry order. Each entry is
/// matched against the first product with the same id; entries without a
/// match become [`CartLineItem::Orphaned`].
#[must_use]
pub fn generate_cart_items(entries: &[CartEntry], products: &[Product]) -> Vec<CartLineItem> {
    entries
        .iter()
        .map(|entry| {
            products
                .iter()
                .find(|product| product.id == entry.product_id)
                .map_or_else(
                    || CartLineItem::Orphaned {
                        product_id: entry.product_id.clone(),
                        quantity: entry.quantity,
                    },
                    |product| CartLineItem::Matched {
                        product: product.clone(),
                        quantity: entry.quantity,
                    },
                )
        })
        .collect()
}

/// Whether a product id is already present in the cart.
///
/// Orphaned lines count too: the backend still holds the entry.
#[must_use]
pub fn is_item_in_cart(items: &[CartLineItem], product_id: &ProductId) -> bool {
    items.iter().any(|item| item.product_id() == product_id)
}

/// Total value of the cart.
///
/// Sums `cost * quantity` over lines with a non-zero quantity. Orphaned lines
/// have no known cost and contribute nothing. Saturates at [`Decimal::MAX`].
#[must_use]
pub fn total_value(items: &[CartLineItem]) -> Decimal {
    items
        .iter()
        .filter(|item| item.quantity() > 0)
        .filter_map(|item| item.cost().map(|cost| cost * item.quantity()))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Number of line entries in the cart.
///
/// Counts lines with a non-empty product id regardless of quantity. This is
/// the number of distinct entries, not the sum of quantities.
#[must_use]
pub fn total_items(items: &[CartLineItem]) -> usize {
    items
        .iter()
        .filter(|item| !item.product_id().is_empty())
        .count()
}

/// Lines shown in the read-only checkout view (quantity above zero).
pub fn checkout_lines(items: &[CartLineItem]) -> impl Iterator<Item = &CartLineItem> {
    items.iter().filter(|item| item.quantity() > 0)
}
