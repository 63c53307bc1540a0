//! Catalog listing, one-shot search and interactive search-as-you-type.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use super::Context;
use crate::render;

/// Fetch the full catalog and print it.
///
/// # Errors
///
/// Returns an error if the catalog could not be fetched.
pub async fn list(ctx: &mut Context) -> Result<(), Box<dyn std::error::Error>> {
    let result = ctx.controller.fetch_products().await;
    print_grid(ctx).await?;
    Ok(result?)
}

/// Search the catalog and print the matches.
///
/// # Errors
///
/// Returns an error if the search failed for a reason other than no match.
pub async fn search(ctx: &mut Context, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.controller.search(text).await?;
    print_grid(ctx).await
}

enum Input {
    Line(Option<String>),
    Settled,
}

/// Read search text from stdin line by line and print results once typing
/// pauses for the configured debounce delay.
///
/// # Errors
///
/// Returns an error if stdin or stdout fail.
pub async fn browse(ctx: &mut Context) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = ctx.controller.fetch_products().await {
        debug!(error = %e, "Initial catalog fetch failed");
    }
    print_grid(ctx).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<JoinHandle<()>> = None;

    loop {
        let input = match pending.as_mut() {
            Some(handle) => tokio::select! {
                line = lines.next_line() => Input::Line(line?),
                _ = handle => Input::Settled,
            },
            None => Input::Line(lines.next_line().await?),
        };

        match input {
            Input::Line(Some(text)) => {
                let text = text.trim().to_string();
                pending = Some(
                    ctx.controller
                        .debounce_search(text, ctx.search_debounce),
                );
            }
            Input::Line(None) => {
                if let Some(handle) = pending.take() {
                    handle.await?;
                    print_grid(ctx).await?;
                }
                return Ok(());
            }
            Input::Settled => {
                pending = None;
                print_grid(ctx).await?;
            }
        }
    }
}

async fn print_grid(ctx: &mut Context) -> Result<(), Box<dyn std::error::Error>> {
    let view = ctx.controller.catalog().await;
    let loading = ctx.controller.is_loading().await;
    ctx.flush_notifications()?;

    let mut out = io::stdout().lock();
    render::product_grid(&mut out, &view, loading)?;
    out.flush()?;
    Ok(())
}
