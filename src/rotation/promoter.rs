//! # Promoter (`finishSecret`)
//!
//! Moves `AWSCURRENT` onto the candidate in one store call, so observers never
//! see zero or two current versions.

use super::StepOutcome;
use crate::constants::STAGE_CURRENT;
use crate::error::RotationResult;
use crate::provider::{SecretStoreProvider, VersionStages};
use tracing::{info, warn};

/// Version currently labelled `AWSCURRENT`, if any
#[must_use]
pub fn current_version(versions: &VersionStages) -> Option<&str> {
    versions
        .iter()
        .find(|(_, stages)| stages.contains(STAGE_CURRENT))
        .map(|(version, _)| version.as_str())
}

/// Promote version `token` to `AWSCURRENT`
///
/// `versions` is the metadata the dispatcher already fetched for this call.
///
/// # Errors
///
/// Store failures pass through unchanged.
pub async fn finish_secret<P>(
    provider: &P,
    secret_id: &str,
    token: &str,
    versions: &VersionStages,
) -> RotationResult<StepOutcome>
where
    P: SecretStoreProvider + ?Sized,
{
    match current_version(versions) {
        Some(current) if current == token => {
            info!("Pending version already current; skipping finish");
            Ok(StepOutcome::AlreadyCurrent)
        }
        Some(current) => {
            provider
                .update_version_stage(secret_id, STAGE_CURRENT, token, Some(current))
                .await?;
            info!(previous = current, "Promoted rotated secret to AWSCURRENT");
            Ok(StepOutcome::Completed)
        }
        None => {
            // Brand-new secret with no current version yet
            warn!("No version holds AWSCURRENT; promoting without a previous version");
            provider
                .update_version_stage(secret_id, STAGE_CURRENT, token, None)
                .await?;
            info!("Promoted rotated secret to AWSCURRENT");
            Ok(StepOutcome::Completed)
        }
    }
}
