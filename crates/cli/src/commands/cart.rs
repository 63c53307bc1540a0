//! Cart panel and cart mutations.

use std::io::{self, Write};

use qkart_core::{CartLineItem, ProductId};
use qkart_storefront::AddToCartOptions;

use super::Context;
use crate::render;

const NOT_LOGGED_IN: &str = "Not logged in. Run `qkart session login --token <token>` first.";

/// Print the cart panel; `checkout` selects the read-only view.
///
/// # Errors
///
/// Returns an error if logged out or if the cart could not be fetched.
pub async fn show(ctx: &mut Context, checkout: bool) -> Result<(), Box<dyn std::error::Error>> {
    load(ctx).await?;
    print_cart(ctx, checkout).await
}

/// Add a product from the catalog with quantity 1, refusing duplicates.
///
/// # Errors
///
/// Returns an error if the product is already in the cart or the update failed.
pub async fn add(ctx: &mut Context, product_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = ProductId::new(product_id);
    // A missing token is reported by the controller, so only load when logged in.
    if ctx.controller.is_logged_in() {
        load(ctx).await?;
    }
    let options = AddToCartOptions {
        prevent_duplicate: true,
    };
    let result = ctx.controller.add_to_cart(&product_id, 1, options).await;
    finish(ctx, result.map(|_| ())).await
}

/// Increase the quantity of a cart line by one.
///
/// # Errors
///
/// Returns an error if the update failed.
pub async fn increment(
    ctx: &mut Context,
    product_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = ProductId::new(product_id);
    let current = current_quantity(ctx, &product_id).await?.unwrap_or(0);
    update(ctx, &product_id, current.saturating_add(1)).await
}

/// Decrease the quantity of a cart line by one; reaching zero removes it.
///
/// # Errors
///
/// Returns an error if the product is not in the cart or the update failed.
pub async fn decrement(
    ctx: &mut Context,
    product_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = ProductId::new(product_id);
    let current = current_quantity(ctx, &product_id)
        .await?
        .ok_or_else(|| format!("Product {product_id} is not in the cart"))?;
    update(ctx, &product_id, current.saturating_sub(1)).await
}

/// Set the absolute quantity of a product.
///
/// # Errors
///
/// Returns an error if the update failed.
pub async fn set(
    ctx: &mut Context,
    product_id: &str,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = ProductId::new(product_id);
    if ctx.controller.is_logged_in() {
        load(ctx).await?;
    }
    update(ctx, &product_id, quantity).await
}

async fn update(
    ctx: &mut Context,
    product_id: &ProductId,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = ctx
        .controller
        .add_to_cart(product_id, quantity, AddToCartOptions::default())
        .await;
    finish(ctx, result.map(|_| ())).await
}

/// Fetch catalog and cart so cart lines can be matched to products.
async fn load(ctx: &mut Context) -> Result<(), Box<dyn std::error::Error>> {
    if !ctx.controller.is_logged_in() {
        return Err(NOT_LOGGED_IN.into());
    }
    let result = ctx.controller.load().await;
    ctx.flush_notifications()?;
    Ok(result?)
}

async fn current_quantity(
    ctx: &mut Context,
    product_id: &ProductId,
) -> Result<Option<u32>, Box<dyn std::error::Error>> {
    load(ctx).await?;
    Ok(ctx
        .controller
        .cart_items()
        .await
        .iter()
        .find(|item| item.product_id() == product_id)
        .map(CartLineItem::quantity))
}

async fn finish(
    ctx: &mut Context,
    result: Result<(), qkart_storefront::StoreError>,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.flush_notifications()?;
    if result.is_ok() {
        print_cart(ctx, false).await?;
    }
    Ok(result?)
}

async fn print_cart(ctx: &Context, checkout: bool) -> Result<(), Box<dyn std::error::Error>> {
    let items = ctx.controller.cart_items().await;
    let mut out = io::stdout().lock();
    render::cart_panel(&mut out, &items, checkout)?;
    out.flush()?;
    Ok(())
}
