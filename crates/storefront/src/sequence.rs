//! Last-writer-wins ordering for concurrent requests.
//!
//! In-flight requests are never cancelled, so a slow response can arrive
//! after a faster, newer one. Each request takes a [`Ticket`] when it is
//! issued; on completion its result is applied only if no newer request of
//! the same class has been issued since.

use std::sync::atomic::{AtomicU64, Ordering};

/// Groups of requests that write the same piece of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestClass {
    /// Full catalog listing and search; both replace the product view.
    Catalog,
    /// Full catalog listing only; owns the reconciliation snapshot and the
    /// loading flag, which search never touches.
    Listing,
    /// Cart fetch and cart mutation; both replace the cart lines.
    Cart,
}

/// Issue order of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    class: RequestClass,
    seq: u64,
}

impl Ticket {
    /// Class the ticket was issued for.
    #[must_use]
    pub const fn class(&self) -> RequestClass {
        self.class
    }
}

/// Per-class monotonically increasing request counters.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    catalog: AtomicU64,
    listing: AtomicU64,
    cart: AtomicU64,
}

impl RequestSequencer {
    /// Create a sequencer with no requests issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request and return its ticket.
    pub fn issue(&self, class: RequestClass) -> Ticket {
        let seq = self.counter(class).fetch_add(1, Ordering::AcqRel) + 1;
        Ticket { class, seq }
    }

    /// Whether `ticket` belongs to the most recently issued request of its class.
    #[must_use]
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.counter(ticket.class).load(Ordering::Acquire) == ticket.seq
    }

    const fn counter(&self, class: RequestClass) -> &AtomicU64 {
        match class {
            RequestClass::Catalog => &self.catalog,
            RequestClass::Listing => &self.listing,
            RequestClass::Cart => &self.cart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.issue(RequestClass::Catalog);
        assert!(sequencer.is_latest(first));

        let second = sequencer.issue(RequestClass::Catalog);
        assert!(!sequencer.is_latest(first));
        assert!(sequencer.is_latest(second));
    }

    #[test]
    fn test_classes_are_independent() {
        let sequencer = RequestSequencer::new();
        let catalog = sequencer.issue(RequestClass::Catalog);
        let cart = sequencer.issue(RequestClass::Cart);
        let _newer_cart = sequencer.issue(RequestClass::Cart);

        let listing = sequencer.issue(RequestClass::Listing);

        assert!(sequencer.is_latest(catalog));
        assert!(sequencer.is_latest(listing));
        assert!(!sequencer.is_latest(cart));
        assert_eq!(cart.class(), RequestClass::Cart);
    }
}
