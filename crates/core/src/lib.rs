//! QKart Core - Shared types and cart math.
//!
//! This crate provides the domain model used across all QKart components:
//! - `storefront` - REST client, controller and client-side state
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async runtime. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, cart entries, line items, ids, costs and ratings
//! - [`cart`] - Reconciliation of server carts against the catalog, and totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{checkout_lines, generate_cart_items, is_item_in_cart, total_items, total_value};
pub use types::*;
