//! Structured JSON logging for the bookmarks service.
//!
//! One line per event on stdout. Request spans from the router's trace layer
//! carry the request id, so every handler log line can be tied to a request.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,tower_http=info";

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(service_name: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::info!(service = service_name, "logging initialized");
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
