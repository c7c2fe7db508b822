//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events; binaries and tests call
//! [`init`] once to print them.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Default directive when neither an explicit level nor `RUST_LOG` is set
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Build the event filter
///
/// An explicit `level` wins; otherwise `RUST_LOG` is used, falling back to
/// [`DEFAULT_DIRECTIVE`].
pub fn filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

/// Install a stderr `fmt` subscriber
///
/// Fails when a global subscriber is already set.
pub fn init(level: Option<&str>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter(level))
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}
