//! In-memory storefront state owned by the controller.

use qkart_core::{CartLineItem, Product};
use rust_decimal::Decimal;

/// What the product grid should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView {
    /// Products from the last listing or search. Empty before anything loads.
    Products(Vec<Product>),
    /// The last search matched nothing (backend answered 404).
    NoResults,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::Products(Vec::new())
    }
}

impl CatalogView {
    /// Products to render; empty for [`CatalogView::NoResults`].
    #[must_use]
    pub fn products(&self) -> &[Product] {
        match self {
            Self::Products(products) => products,
            Self::NoResults => &[],
        }
    }

    /// Whether this is the "no products found" sentinel.
    #[must_use]
    pub const fn is_no_results(&self) -> bool {
        matches!(self, Self::NoResults)
    }
}

/// Everything the presentation layer renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Current product grid (full listing or search results).
    pub catalog: CatalogView,
    /// Last full listing; cart entries are reconciled against it.
    pub catalog_snapshot: Vec<Product>,
    /// Reconciled cart lines.
    pub cart: Vec<CartLineItem>,
    /// A full catalog fetch is in flight.
    pub loading: bool,
}

impl StoreState {
    /// Total value of the cart.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        qkart_core::total_value(&self.cart)
    }

    /// Number of line entries in the cart.
    #[must_use]
    pub fn total_items(&self) -> usize {
        qkart_core::total_items(&self.cart)
    }
}

#[cfg(test)]
mod tests {
    use qkart_core::{Cost, ProductId, Rating};

    use super::*;

    #[test]
    fn test_fresh_catalog_differs_from_no_results() {
        let fresh = CatalogView::default();
        assert_eq!(fresh, CatalogView::Products(Vec::new()));
        assert_ne!(fresh, CatalogView::NoResults);
        assert!(!fresh.is_no_results());
        assert!(CatalogView::NoResults.products().is_empty());
    }

    #[test]
    fn test_totals_delegate_to_cart_lines() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Lamp".to_string(),
            category: "Home".to_string(),
            cost: Cost::from_units(40),
            rating: Rating::default(),
            image_url: String::new(),
        };
        let state = StoreState {
            cart: vec![CartLineItem::Matched {
                product,
                quantity: 2,
            }],
            ..StoreState::default()
        };
        assert_eq!(state.total_value(), Decimal::from(80));
        assert_eq!(state.total_items(), 1);
    }
}
