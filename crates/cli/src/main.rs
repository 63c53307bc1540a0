//! QKart terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! qkart products
//!
//! # Search once
//! qkart search "running shoes"
//!
//! # Search as you type (one query per line on stdin)
//! qkart browse
//!
//! # Store a token issued by the backend
//! qkart session login --token eyJhbGciOi... --username crio
//!
//! # Work with the cart
//! qkart cart add BW0jAAeDJmlZCF8i
//! qkart cart inc BW0jAAeDJmlZCF8i
//! qkart cart show --checkout
//! ```
//!
//! # Commands
//!
//! - `products` - Print the product grid
//! - `search` - Search the catalog
//! - `browse` - Debounced search from stdin
//! - `cart` - Show or change the cart
//! - `session` - Store or clear the auth token

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use qkart_storefront::api::ApiClient;
use qkart_storefront::config::StorefrontConfig;
use qkart_storefront::storage::LocalStorage;
use qkart_storefront::{StoreController, StoreError, notify};

mod commands;
mod render;
mod telemetry;

use commands::Context;

#[derive(Parser)]
#[command(name = "qkart")]
#[command(author, version, about = "QKart terminal storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all products
    Products,
    /// Search products by name or category
    Search {
        /// Search text
        text: String,
    },
    /// Search as you type: each stdin line is a new query
    Browse,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the stored login
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show {
        /// Read-only checkout view (hides zero-quantity lines)
        #[arg(long)]
        checkout: bool,
    },
    /// Add a product with quantity 1
    Add {
        /// Product ID
        product_id: String,
    },
    /// Increase a product's quantity by one
    Inc {
        /// Product ID
        product_id: String,
    },
    /// Decrease a product's quantity by one (zero removes it)
    Dec {
        /// Product ID
        product_id: String,
    },
    /// Set a product's quantity
    Set {
        /// Product ID
        product_id: String,
        /// New quantity (0 removes the product)
        quantity: u32,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Store an auth token
    Login {
        /// Bearer token issued by the backend
        #[arg(short, long)]
        token: String,

        /// Display name
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Remove the stored token
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Keep the guard alive until every event has been flushed
    let sentry_guard = telemetry::init_sentry(&config);

    let result = run(cli, config).await;

    if let Err(e) = &result {
        if e.downcast_ref::<StoreError>().is_some() {
            // Already shown to the user as a notification
            tracing::debug!("Command failed: {e}");
        } else {
            tracing::error!("Command failed: {e}");
        }
    }

    drop(sentry_guard);

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let api = ApiClient::new(&config.api)?;
    let storage = LocalStorage::open(&config.storage_path)?;
    let (notifier, notifications) = notify::channel();

    let mut ctx = Context {
        controller: StoreController::new(api, storage, notifier),
        notifications,
        search_debounce: config.search_debounce,
    };

    let result = match cli.command {
        Commands::Products => commands::products::list(&mut ctx).await,
        Commands::Search { text } => commands::products::search(&mut ctx, &text).await,
        Commands::Browse => commands::products::browse(&mut ctx).await,
        Commands::Cart { action } => match action {
            CartAction::Show { checkout } => commands::cart::show(&mut ctx, checkout).await,
            CartAction::Add { product_id } => commands::cart::add(&mut ctx, &product_id).await,
            CartAction::Inc { product_id } => {
                commands::cart::increment(&mut ctx, &product_id).await
            }
            CartAction::Dec { product_id } => {
                commands::cart::decrement(&mut ctx, &product_id).await
            }
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&mut ctx, &product_id, quantity).await,
        },
        Commands::Session { action } => match action {
            SessionAction::Login { token, username } => {
                commands::session::login(&ctx, &token, username.as_deref())
            }
            SessionAction::Logout => commands::session::logout(&ctx),
        },
    };

    ctx.flush_notifications()?;
    result
}
