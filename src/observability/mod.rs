//! # Observability
//!
//! Observability modules for metrics and logging.
//!
//! - `logging`: `tracing` subscriber setup driven by `LOG_LEVEL`
//! - `metrics`: Prometheus metrics collection

pub mod logging;
pub mod metrics;

// Re-export for convenience
pub use logging::init_logging;
