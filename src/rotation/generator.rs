//! # Candidate Generator (`createSecret`)
//!
//! Writes the `AWSPENDING` candidate for a token, at most once.

use super::payload::{generate_rotated_secret, load_secret};
use super::StepOutcome;
use crate::constants::{STAGE_CURRENT, STAGE_PENDING};
use crate::error::{RotationResult, StoreError};
use crate::provider::SecretStoreProvider;
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

/// Create the pending candidate for `token`
///
/// A candidate already stored under the token is left untouched. Otherwise
/// the current version is cloned, its rotated fields regenerated, and the
/// result written as version `token` labelled `AWSPENDING`.
///
/// # Errors
///
/// Fails if the current version cannot be read or parsed, or if the store
/// rejects a call for any reason other than "not found" on the existence check.
pub async fn create_secret<P>(provider: &P, secret_id: &str, token: &str) -> RotationResult<StepOutcome>
where
    P: SecretStoreProvider + ?Sized,
{
    match provider
        .get_secret_value(secret_id, STAGE_PENDING, Some(token))
        .await
    {
        Ok(_) => {
            info!("Pending secret version already created; skipping regeneration");
            return Ok(StepOutcome::Skipped);
        }
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let current = load_secret(provider, secret_id, STAGE_CURRENT, None).await?;
    let pending = generate_rotated_secret(&current, Utc::now());
    let secret_string = Value::Object(pending).to_string();

    match provider
        .put_secret_value(secret_id, token, &secret_string, &[STAGE_PENDING])
        .await
    {
        Ok(()) => {
            info!("Stored rotated secret candidate");
            Ok(StepOutcome::Completed)
        }
        // Another invocation wrote this token's candidate first; theirs stands
        Err(StoreError::AlreadyExists(reason)) => {
            warn!(reason = %reason, "Pending secret version created concurrently; keeping existing candidate");
            Ok(StepOutcome::Skipped)
        }
        Err(e) => Err(e.into()),
    }
}
