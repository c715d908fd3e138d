//! # Secret Payloads
//!
//! Load, parse, and regenerate the JSON object stored in each version.

use crate::constants::{ENCRYPTION_KEY_LEN, ROTATED_FIELDS, ROTATION_METADATA_FIELD};
use crate::error::{RotationError, RotationResult};
use crate::provider::SecretStoreProvider;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use chrono::{DateTime, SecondsFormat, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::{Map, Value};
use zeroize::Zeroizing;

/// Field name -> value
///
/// Static fields may hold any JSON value and are carried through as-is.
pub type SecretPayload = Map<String, Value>;

/// Read and parse the version holding `stage` (optionally pinned to `version_id`)
///
/// # Errors
///
/// Store failures pass through; a missing string payload or a payload that is
/// not a JSON object is a [`RotationError`].
pub async fn load_secret<P>(
    provider: &P,
    secret_id: &str,
    stage: &str,
    version_id: Option<&str>,
) -> RotationResult<SecretPayload>
where
    P: SecretStoreProvider + ?Sized,
{
    let stored = provider
        .get_secret_value(secret_id, stage, version_id)
        .await?;
    let secret_string = stored
        .secret_string
        .ok_or(RotationError::MissingSecretString)?;
    parse_payload(&secret_string)
}

/// Parse a stored secret string into a field map
///
/// # Errors
///
/// Returns [`RotationError::InvalidJson`] unless the text is a JSON object.
pub fn parse_payload(secret_string: &str) -> RotationResult<SecretPayload> {
    match serde_json::from_str::<Value>(secret_string) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(RotationError::InvalidJson(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(RotationError::InvalidJson(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fresh 256-bit key from the OS RNG, base64 encoded
#[must_use]
pub fn generate_encryption_key() -> String {
    let mut key = Zeroizing::new([0u8; ENCRYPTION_KEY_LEN]);
    OsRng.fill_bytes(&mut *key);
    BASE64_STANDARD.encode(&*key)
}

/// Copy `current`, replacing every rotated field and stamping the rotation time
#[must_use]
pub fn generate_rotated_secret(current: &SecretPayload, rotated_at: DateTime<Utc>) -> SecretPayload {
    let mut updated = current.clone();
    for field in ROTATED_FIELDS {
        updated.insert((*field).to_string(), Value::String(generate_encryption_key()));
    }
    updated.insert(
        ROTATION_METADATA_FIELD.to_string(),
        Value::String(rotated_at.to_rfc3339_opts(SecondsFormat::Micros, false)),
    );
    updated
}
