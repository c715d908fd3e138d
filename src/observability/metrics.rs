//! # Metrics
//!
//! Prometheus metrics for monitoring rotation runs.
//!
//! ## Metrics Exposed
//!
//! - `secret_rotator_steps_total` - Rotation steps handled, by step and outcome
//! - `secret_rotator_step_duration_seconds` - Duration of rotation steps, by step
//! - `secret_rotator_store_operations_total` - Secret store calls, by operation
//! - `secret_rotator_store_errors_total` - Failed secret store calls, by operation

use anyhow::Result;
use prometheus::{Encoder, HistogramVec, IntCounterVec, Registry, TextEncoder};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static STEPS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_rotator_steps_total",
            "Total number of rotation steps handled by step and outcome",
        ),
        &["step", "outcome"],
    )
    .expect("Failed to create STEPS_TOTAL metric - this should never happen")
});

static STEP_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "secret_rotator_step_duration_seconds",
            "Duration of rotation steps in seconds by step",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["step"],
    )
    .expect("Failed to create STEP_DURATION metric - this should never happen")
});

static STORE_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_rotator_store_operations_total",
            "Total number of secret store operations by operation",
        ),
        &["operation"],
    )
    .expect("Failed to create STORE_OPERATIONS_TOTAL metric - this should never happen")
});

static STORE_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_rotator_store_errors_total",
            "Total number of failed secret store operations by operation",
        ),
        &["operation"],
    )
    .expect("Failed to create STORE_ERRORS_TOTAL metric - this should never happen")
});

/// Outcome of the one-time registration, shared by every caller
static REGISTRATION: LazyLock<Result<(), String>> = LazyLock::new(|| {
    let register = || -> prometheus::Result<()> {
        REGISTRY.register(Box::new(STEPS_TOTAL.clone()))?;
        REGISTRY.register(Box::new(STEP_DURATION.clone()))?;
        REGISTRY.register(Box::new(STORE_OPERATIONS_TOTAL.clone()))?;
        REGISTRY.register(Box::new(STORE_ERRORS_TOTAL.clone()))?;
        Ok(())
    };
    register().map_err(|e| e.to_string())
});

/// Register all metrics with the process registry
///
/// Safe to call more than once; only the first call registers.
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    REGISTRATION
        .clone()
        .map_err(|e| anyhow::anyhow!("Failed to register metrics: {e}"))
}

/// Record a finished rotation step
pub fn record_step(step: &str, outcome: &str, duration: f64) {
    STEPS_TOTAL.with_label_values(&[step, outcome]).inc();
    STEP_DURATION.with_label_values(&[step]).observe(duration);
}

/// Record a secret store call
pub fn record_store_operation(operation: &str) {
    STORE_OPERATIONS_TOTAL.with_label_values(&[operation]).inc();
}

/// Increment store error counter
pub fn increment_store_errors(operation: &str) {
    STORE_ERRORS_TOTAL.with_label_values(&[operation]).inc();
}

/// Render registered metrics in the Prometheus text exposition format
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn gather_text() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
pub(crate) fn step_count(step: &str, outcome: &str) -> u64 {
    STEPS_TOTAL.with_label_values(&[step, outcome]).get()
}
