//! QKart storefront client library.
//!
//! Everything between the backend REST API and the presentation layer:
//! fetching and searching the catalog, keeping the cart in sync, and the
//! client-side state those produce.
//!
//! # Architecture
//!
//! - [`api`] - `reqwest` client for the backend, behind the [`api::StoreApi`] trait
//! - [`controller`] - owns state, orchestrates calls, reports outcomes
//! - [`debounce`] - search-as-you-type scheduling
//! - [`sequence`] - drops responses superseded by newer requests
//! - [`storage`] - persisted auth token and username
//! - [`notify`] - transient user notifications
//!
//! # Example
//!
//! ```rust,ignore
//! use qkart_storefront::{api::ApiClient, config::StorefrontConfig, controller::StoreController};
//! use qkart_storefront::{notify, storage::LocalStorage};
//!
//! let config = StorefrontConfig::from_env()?;
//! let api = ApiClient::new(&config.api)?;
//! let storage = LocalStorage::open(&config.storage_path)?;
//! let (notifier, mut notifications) = notify::channel();
//!
//! let controller = StoreController::new(api, storage, notifier);
//! controller.load().await.ok();
//! for notification in notifications.drain() {
//!     eprintln!("{}: {}", notification.severity, notification.message);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod notify;
pub mod sequence;
pub mod storage;

pub use controller::{AddToCartOptions, CatalogView, StoreController, StoreState};
pub use error::StoreError;
