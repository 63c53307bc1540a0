//! Plain-text rendering of the product grid, the cart panel and
//! notifications.
//!
//! Everything writes to a caller-supplied [`Write`] so the output can be
//! captured in tests.

use std::io::{self, Write};

use qkart_core::{CartLineItem, checkout_lines, total_items, total_value};
use qkart_storefront::CatalogView;
use qkart_storefront::notify::{Notification, Severity};

pub const LOADING: &str = "Loading Products...";
pub const NO_PRODUCTS: &str = "No products found";
pub const EMPTY_CART: &str = "Cart is empty. Add more items to the cart to checkout.";

/// Print the product grid, one product per line.
pub fn product_grid(out: &mut impl Write, view: &CatalogView, loading: bool) -> io::Result<()> {
    if loading {
        return writeln!(out, "{LOADING}");
    }

    match view {
        CatalogView::NoResults => writeln!(out, "{NO_PRODUCTS}"),
        CatalogView::Products(products) => {
            for product in products {
                writeln!(
                    out,
                    "{:<26} {:<32} {:<14} {:>10}  {}",
                    product.id.as_str(),
                    product.name,
                    product.category,
                    product.cost.to_string(),
                    product.rating
                )?;
            }
            Ok(())
        }
    }
}

/// Print the cart panel.
///
/// The read-only (checkout) variant lists only lines with a non-zero
/// quantity. The item count and total always cover the whole cart.
pub fn cart_panel(out: &mut impl Write, items: &[CartLineItem], read_only: bool) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "{EMPTY_CART}");
    }

    let lines: Vec<&CartLineItem> = if read_only {
        checkout_lines(items).collect()
    } else {
        items.iter().collect()
    };

    for item in lines {
        cart_line(out, item)?;
    }

    writeln!(out)?;
    writeln!(out, "Items: {}", total_items(items))?;
    writeln!(out, "Total: ${}", total_value(items).normalize())
}

fn cart_line(out: &mut impl Write, item: &CartLineItem) -> io::Result<()> {
    match item {
        CartLineItem::Matched { product, quantity } => writeln!(
            out,
            "{:<26} {:<32} x{:<4} {:>10}",
            product.id.as_str(),
            product.name,
            quantity,
            product.cost.to_string()
        ),
        CartLineItem::Orphaned {
            product_id,
            quantity,
        } => writeln!(
            out,
            "{:<26} {:<32} x{quantity}",
            product_id.as_str(),
            format!("Unavailable product ({product_id})")
        ),
    }
}

/// Print one notification.
pub fn notification(out: &mut impl Write, notification: &Notification) -> io::Result<()> {
    let label = match notification.severity {
        Severity::Success => "ok",
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    writeln!(out, "[{label}] {}", notification.message)
}
