//! # Errors
//!
//! Every failure of a rotation step surfaces as a [`RotationError`]. The
//! orchestrator reads any error as "step failed, do not advance" and owns
//! retry and alerting, so nothing here is recovered locally.

use thiserror::Error;

/// Failure reported by a secret store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// The secret, version, or stage does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A version with this client request token already exists with different content
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// The store refused the request (bad parameters, stage ownership mismatch, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other backend failure (transport, throttling, permissions)
    #[error("Secret store error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// True for the "does not exist yet" case
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Rotation workflow failure
#[derive(Debug, Error)]
pub enum RotationError {
    /// The request token is not a version of the secret
    #[error("Secret version {token} not set on metadata for {secret_id}")]
    TokenNotFound { secret_id: String, token: String },

    /// The request token's version is neither current nor pending
    #[error("Secret version {token} not marked as AWSPENDING for {secret_id}")]
    NotPending { secret_id: String, token: String },

    /// The step name is not one of the four rotation steps
    #[error("Unknown rotation step '{0}'")]
    UnknownStep(String),

    /// The stored version has no string payload
    #[error("Secret value does not contain a SecretString")]
    MissingSecretString,

    /// The stored payload is not a JSON object
    #[error("Secret string is not valid JSON: {0}")]
    InvalidJson(String),

    /// The candidate lacks one or more rotated fields
    #[error("Pending secret missing rotated keys: {0:?}")]
    MissingRotatedFields(Vec<String>),

    /// The key field is not base64 text
    #[error("{field} is not valid base64")]
    InvalidKeyEncoding { field: String },

    /// The key field decodes to the wrong number of bytes
    #[error("{field} must decode to {expected} bytes (got {actual})")]
    InvalidKeyLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Pass-through failure from the secret store
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for rotation operations
pub type RotationResult<T> = std::result::Result<T, RotationError>;
