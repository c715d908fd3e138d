//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ## Usage
//!
//! ```rust
//! use secret_rotator::prelude::*;
//! ```
//!
//! This brings into scope:
//! - The coordinator and request types
//! - The store provider trait and its implementations
//! - Error types

pub use crate::config::RotatorConfig;
pub use crate::error::{RotationError, RotationResult, StoreError};
pub use crate::provider::{
    AwsSecretsManager, InMemorySecretStore, SecretStoreProvider, StoredSecret, VersionStages,
};
pub use crate::rotation::{
    RotationCoordinator, RotationRequest, RotationStep, SecretPayload, StepOutcome,
};
