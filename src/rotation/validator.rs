//! # Candidate Validator (`testSecret`)
//!
//! Read-only acceptance check run before a candidate may become current.
//! The same candidate always gets the same verdict.

use super::payload::{load_secret, SecretPayload};
use super::StepOutcome;
use crate::constants::{ENCRYPTION_KEY_LEN, FIELD_ENCRYPTION_KEY, ROTATED_FIELDS, STAGE_PENDING};
use crate::error::{RotationError, RotationResult};
use crate::provider::SecretStoreProvider;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde_json::Value;
use tracing::info;
use zeroize::Zeroizing;

/// Standard alphabet, padding required, stray bits after the last byte ignored
const KEY_DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Validate the pending candidate stored under `token`
///
/// # Errors
///
/// Fails if the candidate cannot be loaded or parsed, or if
/// [`validate_candidate`] rejects it.
pub async fn test_secret<P>(provider: &P, secret_id: &str, token: &str) -> RotationResult<StepOutcome>
where
    P: SecretStoreProvider + ?Sized,
{
    let candidate = load_secret(provider, secret_id, STAGE_PENDING, Some(token)).await?;
    validate_candidate(&candidate)?;
    info!("Validated rotated secret candidate");
    Ok(StepOutcome::Completed)
}

/// Check a candidate payload
///
/// Every rotated field must be present (all missing names are reported
/// together) and the encryption key must be base64 for exactly 32 bytes.
/// Other fields are not inspected.
///
/// # Errors
///
/// Returns the first failing check as a [`RotationError`].
pub fn validate_candidate(candidate: &SecretPayload) -> RotationResult<()> {
    let missing: Vec<String> = ROTATED_FIELDS
        .iter()
        .filter(|field| !candidate.contains_key(**field))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(RotationError::MissingRotatedFields(missing));
    }

    if let Some(value) = candidate.get(FIELD_ENCRYPTION_KEY) {
        validate_key(FIELD_ENCRYPTION_KEY, value)?;
    }
    Ok(())
}

fn validate_key(field: &str, value: &Value) -> RotationResult<()> {
    let invalid_encoding = || RotationError::InvalidKeyEncoding {
        field: field.to_string(),
    };

    let text = value.as_str().ok_or_else(invalid_encoding)?;
    let raw = Zeroizing::new(
        KEY_DECODER
            .decode(text)
            .map_err(|_decode| invalid_encoding())?,
    );

    if raw.len() != ENCRYPTION_KEY_LEN {
        return Err(RotationError::InvalidKeyLength {
            field: field.to_string(),
            expected: ENCRYPTION_KEY_LEN,
            actual: raw.len(),
        });
    }
    Ok(())
}
