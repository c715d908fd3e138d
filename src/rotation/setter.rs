//! # Setter (`setSecret`)
//!
//! Consumers read the secret straight from the store, so there is no
//! downstream system to hand the candidate to. Propagation to one would go here.

use super::StepOutcome;
use tracing::debug;

/// Propagate the pending candidate downstream
pub fn set_secret(secret_id: &str, token: &str) -> StepOutcome {
    debug!(
        secret_id = secret_id,
        token = token,
        "SetSecret step is a no-op for application configuration secrets"
    );
    StepOutcome::Skipped
}
