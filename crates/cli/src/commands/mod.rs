//! Subcommand implementations.

use std::io::{self, Write};
use std::time::Duration;

use qkart_storefront::StoreController;
use qkart_storefront::api::ApiClient;
use qkart_storefront::notify::Notifications;

use crate::render;

pub mod cart;
pub mod products;
pub mod session;

/// Everything a subcommand needs.
pub struct Context {
    pub controller: StoreController<ApiClient>,
    pub notifications: Notifications,
    pub search_debounce: Duration,
}

impl Context {
    /// Print queued notifications to stderr.
    pub fn flush_notifications(&mut self) -> io::Result<()> {
        let mut err = io::stderr().lock();
        for notification in self.notifications.drain() {
            render::notification(&mut err, &notification)?;
        }
        err.flush()
    }
}
