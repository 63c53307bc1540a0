//! Persisted login state.
//!
//! Login and registration endpoints are not part of the storefront client;
//! a token obtained elsewhere is stored here and sent with cart requests.

use std::io::{self, Write};

use qkart_storefront::storage::{TOKEN_KEY, USERNAME_KEY};
use tracing::info;

use super::Context;

/// Store an auth token and optional username.
///
/// # Errors
///
/// Returns an error if the storage file cannot be written.
pub fn login(
    ctx: &Context,
    token: &str,
    username: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if token.trim().is_empty() {
        return Err("Token must not be empty".into());
    }

    let storage = ctx.controller.storage();
    storage.set(TOKEN_KEY, token.trim())?;
    match username {
        Some(username) => storage.set(USERNAME_KEY, username)?,
        None => storage.remove(USERNAME_KEY)?,
    }
    info!(username = ?username, "Stored session");

    let mut out = io::stdout().lock();
    match username {
        Some(username) => writeln!(out, "Logged in as {username}")?,
        None => writeln!(out, "Logged in")?,
    }
    Ok(())
}

/// Remove the stored token and username.
///
/// # Errors
///
/// Returns an error if the storage file cannot be written.
pub fn logout(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let storage = ctx.controller.storage();
    storage.remove(TOKEN_KEY)?;
    storage.remove(USERNAME_KEY)?;
    info!("Cleared session");

    writeln!(io::stdout().lock(), "Logged out")?;
    Ok(())
}
