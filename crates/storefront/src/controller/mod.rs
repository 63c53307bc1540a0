//! Product and cart controller.
//!
//! Owns the storefront's in-memory state and drives every backend call:
//! catalog listing, search, cart fetch and cart mutation. Failures are
//! reported to the user through the [`Notifier`] and never leave the state
//! half-updated.
//!
//! Requests are not cancelled when a newer one is issued. Instead each
//! response is checked against the [`RequestSequencer`] and dropped if a
//! newer request of the same class has been issued since.

mod state;


pub use state::{CatalogView, StoreState};

use std::sync::Arc;
use std::time::Duration;

use qkart_core::{CartLineItem, ProductId, generate_cart_items, is_item_in_cart};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::api::{ApiError, StoreApi};
use crate::debounce::Debouncer;
use crate::error::{
    ALREADY_IN_CART, BACKEND_UNREACHABLE, CART_UNAVAILABLE, CART_UPDATED, CATALOG_UNAVAILABLE,
    LOGIN_REQUIRED, StoreError,
};
use crate::notify::Notifier;
use crate::sequence::{RequestClass, RequestSequencer};
use crate::storage::LocalStorage;

/// Options for [`StoreController::add_to_cart`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddToCartOptions {
    /// Refuse (with a warning) if the product is already in the cart.
    pub prevent_duplicate: bool,
}

/// Storefront controller.
///
/// This struct is cheaply cloneable via `Arc`; clones share state.
pub struct StoreController<A> {
    inner: Arc<ControllerInner<A>>,
}

impl<A> Clone for StoreController<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<A> {
    api: A,
    storage: LocalStorage,
    notifier: Notifier,
    state: RwLock<StoreState>,
    sequencer: RequestSequencer,
    search_debouncer: Debouncer,
}

impl<A: StoreApi> StoreController<A> {
    /// Create a controller with empty state.
    #[must_use]
    pub fn new(api: A, storage: LocalStorage, notifier: Notifier) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                api,
                storage,
                notifier,
                state: RwLock::new(StoreState::default()),
                sequencer: RequestSequencer::new(),
                search_debouncer: Debouncer::new(),
            }),
        }
    }

    /// Initial page load: catalog, then the cart if logged in.
    ///
    /// The cart is fetched even if the catalog failed; its lines are then
    /// reconciled against whatever snapshot is available.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the catalog failed, otherwise the cart
    /// error. Both have already been reported to the user.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), StoreError> {
        let catalog = self.fetch_products().await;
        let cart = self.fetch_cart().await;
        catalog?;
        cart.map(|_| ())
    }

    /// Fetch the full catalog, replacing the product view and the snapshot
    /// used for cart reconciliation.
    ///
    /// Only the latest listing writes the snapshot and clears `loading`. A
    /// search issued meanwhile keeps its results in view.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` or `Connectivity`; the user has been notified.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<(), StoreError> {
        let view_ticket = self.inner.sequencer.issue(RequestClass::Catalog);
        let listing_ticket = self.inner.sequencer.issue(RequestClass::Listing);
        self.inner.state.write().await.loading = true;

        let result = self.inner.api.fetch_products().await;

        let mut state = self.inner.state.write().await;
        let latest_listing = self.inner.sequencer.is_latest(listing_ticket);
        let latest_view = latest_listing && self.inner.sequencer.is_latest(view_ticket);
        if latest_listing {
            state.loading = false;
        }

        match result {
            Ok(products) => {
                if !latest_listing {
                    debug!("Dropping stale catalog listing");
                    return Ok(());
                }
                if latest_view {
                    state.catalog = CatalogView::Products(products.clone());
                } else {
                    debug!("Search issued since listing, keeping search results in view");
                }
                state.catalog_snapshot = products;
                Ok(())
            }
            Err(e) => {
                let err = StoreError::from(e);
                if latest_view {
                    if matches!(err, StoreError::BadRequest(_)) {
                        state.catalog = CatalogView::default();
                    }
                    self.inner
                        .notifier
                        .error(err.user_message(CATALOG_UNAVAILABLE));
                }
                Err(err)
            }
        }
    }

    /// Replace the product view with search results.
    ///
    /// A 404 from the backend means nothing matched and sets
    /// [`CatalogView::NoResults`].
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` or `Connectivity` for failures other than 404;
    /// the user has been notified and the view is unchanged.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<(), StoreError> {
        let ticket = self.inner.sequencer.issue(RequestClass::Catalog);

        let result = self.inner.api.search_products(text).await;

        let mut state = self.inner.state.write().await;
        if !self.inner.sequencer.is_latest(ticket) {
            debug!("Dropping stale search response");
            return Ok(());
        }

        match result {
            Ok(products) => {
                state.catalog = CatalogView::Products(products);
                Ok(())
            }
            Err(ApiError::NotFound) => {
                state.catalog = CatalogView::NoResults;
                Ok(())
            }
            Err(e) => {
                let err = StoreError::from(e);
                self.inner
                    .notifier
                    .error(err.user_message(CATALOG_UNAVAILABLE));
                Err(err)
            }
        }
    }

    /// Schedule a search for `text` after `delay`, superseding any search
    /// scheduled earlier that has not fired yet.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn debounce_search(&self, text: impl Into<String>, delay: Duration) -> JoinHandle<()> {
        let controller = self.clone();
        let text = text.into();
        self.inner.search_debouncer.schedule(delay, move || async move {
            if let Err(e) = controller.search(&text).await {
                debug!(error = %e, "Debounced search failed");
            }
        })
    }

    /// Fetch the cart and reconcile it against the catalog snapshot.
    ///
    /// Returns `Ok(None)` without making a request when logged out, and also
    /// when a newer cart request was issued while this one was in flight.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` or `Connectivity`; the user has been notified.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<Option<Vec<CartLineItem>>, StoreError> {
        let Some(token) = self.inner.storage.token() else {
            debug!("No auth token, skipping cart fetch");
            return Ok(None);
        };

        let ticket = self.inner.sequencer.issue(RequestClass::Cart);

        let result = self.inner.api.fetch_cart(&token).await;

        let mut state = self.inner.state.write().await;
        if !self.inner.sequencer.is_latest(ticket) {
            debug!("Dropping stale cart response");
            return Ok(None);
        }

        match result {
            Ok(entries) => {
                let items = generate_cart_items(&entries, &state.catalog_snapshot);
                state.cart.clone_from(&items);
                Ok(Some(items))
            }
            Err(e) => {
                drop(state);
                let err = StoreError::from(e);
                self.inner.notifier.error(err.user_message(CART_UNAVAILABLE));
                Err(err)
            }
        }
    }

    /// Set the cart quantity of a product.
    ///
    /// `quantity` is absolute; the caller computes `current + 1` or
    /// `current - 1`. Zero removes the product.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if no token is stored (no request is made)
    /// - `DuplicateRejected` if `prevent_duplicate` is set and the product is
    ///   already in the cart (no request is made)
    /// - `BadRequest` / `Connectivity` if the backend call fails
    ///
    /// In every case the user has been notified and the cart is unchanged.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
        options: AddToCartOptions,
    ) -> Result<Vec<CartLineItem>, StoreError> {
        let Some(token) = self.inner.storage.token() else {
            self.inner.notifier.warning(LOGIN_REQUIRED);
            return Err(StoreError::Unauthenticated);
        };

        if options.prevent_duplicate
            && is_item_in_cart(&self.inner.state.read().await.cart, product_id)
        {
            self.inner.notifier.warning(ALREADY_IN_CART);
            return Err(StoreError::DuplicateRejected(product_id.clone()));
        }

        let ticket = self.inner.sequencer.issue(RequestClass::Cart);

        let result = self
            .inner
            .api
            .update_cart(&token, product_id, quantity)
            .await;

        match result {
            Ok(entries) => {
                let mut state = self.inner.state.write().await;
                let items = generate_cart_items(&entries, &state.catalog_snapshot);
                if self.inner.sequencer.is_latest(ticket) {
                    state.cart.clone_from(&items);
                } else {
                    debug!("Newer cart request in flight, not applying this response");
                }
                drop(state);
                self.inner.notifier.success(CART_UPDATED);
                Ok(items)
            }
            Err(e) => {
                let err = StoreError::from(e);
                self.inner
                    .notifier
                    .error(err.user_message(BACKEND_UNREACHABLE));
                Err(err)
            }
        }
    }

    /// Copy of the full state.
    pub async fn snapshot(&self) -> StoreState {
        self.inner.state.read().await.clone()
    }

    /// Current product view.
    pub async fn catalog(&self) -> CatalogView {
        self.inner.state.read().await.catalog.clone()
    }

    /// Current cart lines.
    pub async fn cart_items(&self) -> Vec<CartLineItem> {
        self.inner.state.read().await.cart.clone()
    }

    /// Whether a full catalog fetch is in flight.
    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.loading
    }

    /// Total value of the cart.
    pub async fn total_value(&self) -> Decimal {
        self.inner.state.read().await.total_value()
    }

    /// Number of line entries in the cart.
    pub async fn total_items(&self) -> usize {
        self.inner.state.read().await.total_items()
    }

    /// Whether an auth token is stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.storage.token().is_some()
    }

    /// Client storage shared with the controller.
    #[must_use]
    pub fn storage(&self) -> &LocalStorage {
        &self.inner.storage
    }
}
