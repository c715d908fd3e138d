//! # Provider Modules
//!
//! Secret store backends the rotation coordinator talks to.
//!
//! The coordinator never holds state between invocations: every step re-reads
//! what it needs through a [`SecretStoreProvider`]. Backends are constructed by
//! the caller and injected, so tests substitute [`memory::InMemorySecretStore`]
//! for the real AWS client.

use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

/// Version id -> stage labels attached to that version
pub type VersionStages = BTreeMap<String, BTreeSet<String>>;

/// A single version as returned by a value read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSecret {
    /// Version the store resolved the request to
    pub version_id: String,
    /// String payload, absent for binary-only versions
    pub secret_string: Option<String>,
}

/// Provider trait for versioned secret stores with stage labels
#[async_trait]
pub trait SecretStoreProvider: Send + Sync {
    /// Fetch the version -> stages map for a secret
    async fn describe_version_stages(&self, secret_id: &str) -> Result<VersionStages, StoreError>;

    /// Read the version holding `stage`, optionally pinned to `version_id`
    ///
    /// Returns [`StoreError::NotFound`] when no version matches both.
    async fn get_secret_value(
        &self,
        secret_id: &str,
        stage: &str,
        version_id: Option<&str>,
    ) -> Result<StoredSecret, StoreError>;

    /// Create version `token` holding `secret_string`, labelled with `stages`
    ///
    /// Repeating the call with the same token and payload is a no-op; the same
    /// token with a different payload is rejected with [`StoreError::AlreadyExists`].
    async fn put_secret_value(
        &self,
        secret_id: &str,
        token: &str,
        secret_string: &str,
        stages: &[&str],
    ) -> Result<(), StoreError>;

    /// Atomically move `stage` onto `move_to`, detaching it from `remove_from`
    async fn update_version_stage(
        &self,
        secret_id: &str,
        stage: &str,
        move_to: &str,
        remove_from: Option<&str>,
    ) -> Result<(), StoreError>;
}

// Provider implementations
pub mod aws;
pub mod memory;

pub use aws::AwsSecretsManager;
pub use memory::InMemorySecretStore;
