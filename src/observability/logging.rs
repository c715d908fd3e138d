//! # Logging
//!
//! Installs the global `tracing` subscriber.
//!
//! `RUST_LOG` takes precedence when set so operators can target individual
//! modules; otherwise the filter is derived from `LOG_LEVEL`.

use crate::config::{LogFormat, RotatorConfig};
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Build the filter for the given configuration
#[must_use]
pub fn build_filter(config: &RotatorConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.filter_directive()))
}

/// Initialize the global subscriber
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &RotatorConfig) -> Result<()> {
    let filter = build_filter(config);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.log_format {
        LogFormat::Json => builder
            .json()
            .with_current_span(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install JSON log subscriber: {e}")),
        LogFormat::Text => builder
            .with_ansi(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install text log subscriber: {e}")),
    }
}
