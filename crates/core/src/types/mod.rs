//! Core types for QKart.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod rating;

pub use cart::{CartEntry, CartLineItem};
pub use id::ProductId;
pub use price::Cost;
pub use product::Product;
pub use rating::{Rating, RatingError};
