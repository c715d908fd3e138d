//! # In-Memory Secret Store
//!
//! Secret store with the managed service's staging semantics, held entirely in
//! process memory. Used by the test suites and for local dry runs.
//!
//! Label rules mirror Secrets Manager:
//! - a stage label is attached to at most one version of a secret
//! - writing a version with a label detaches that label from its previous holder
//! - moving `AWSCURRENT` requires naming the current holder in `remove_from`;
//!   the demoted version receives `AWSPREVIOUS` and the promoted version drops
//!   `AWSPENDING`, which is how the service marks a rotation complete
//! - a version created by [`InMemorySecretStore::begin_rotation`] is listed in
//!   the metadata but has no value until the candidate is written
//!
//! This is ephemeral - data does not persist across restarts.
//! Thread-safe using Arc<RwLock> for concurrent access.

use crate::constants::{STAGE_CURRENT, STAGE_PENDING, STAGE_PREVIOUS};
use crate::error::StoreError;
use crate::provider::{SecretStoreProvider, StoredSecret, VersionStages};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A single version of a secret
#[derive(Debug, Clone, Default)]
struct SecretVersion {
    /// Payload; `None` until a value has been written for this version
    secret_string: Option<String>,
    stages: BTreeSet<String>,
}

/// All versions of one secret, keyed by version id
#[derive(Debug, Clone, Default)]
struct SecretEntry {
    versions: BTreeMap<String, SecretVersion>,
}

impl SecretEntry {
    /// Version currently carrying `stage`
    fn holder_of(&self, stage: &str) -> Option<String> {
        self.versions
            .iter()
            .find(|(_, version)| version.stages.contains(stage))
            .map(|(id, _)| id.clone())
    }

    /// Attach `stage` to `version_id`, detaching it from every other version
    fn attach_exclusive(&mut self, stage: &str, version_id: &str) {
        for (id, version) in &mut self.versions {
            if id == version_id {
                version.stages.insert(stage.to_string());
            } else {
                version.stages.remove(stage);
            }
        }
    }
}

/// In-memory versioned secret store
#[derive(Clone, Debug, Default)]
pub struct InMemorySecretStore {
    store: Arc<RwLock<HashMap<String, SecretEntry>>>,
}

impl InMemorySecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a version with a value and the given labels
    ///
    /// Labels are moved off any other version that carried them. Creates the
    /// secret if it does not exist yet.
    pub async fn seed_version(
        &self,
        secret_id: &str,
        version_id: &str,
        secret_string: &str,
        stages: &[&str],
    ) {
        let mut store = self.store.write().await;
        let entry = store.entry(secret_id.to_string()).or_default();
        entry.versions.insert(
            version_id.to_string(),
            SecretVersion {
                secret_string: Some(secret_string.to_string()),
                stages: BTreeSet::new(),
            },
        );
        for stage in stages {
            entry.attach_exclusive(stage, version_id);
        }
        debug!("Seeded version {} of secret {}", version_id, secret_id);
    }

    /// Register `token` as the pending version of a new rotation cycle
    ///
    /// The version carries `AWSPENDING` but no value, the way the service
    /// prepares a secret before invoking the first rotation step.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the secret does not exist.
    pub async fn begin_rotation(&self, secret_id: &str, token: &str) -> Result<(), StoreError> {
        let mut store = self.store.write().await;
        let entry = store
            .get_mut(secret_id)
            .ok_or_else(|| StoreError::NotFound(format!("secret {secret_id}")))?;
        entry.versions.entry(token.to_string()).or_default();
        entry.attach_exclusive(STAGE_PENDING, token);
        debug!("Started rotation {} for secret {}", token, secret_id);
        Ok(())
    }

    /// Snapshot of the version -> stages map, including unlabelled versions
    pub async fn version_stages(&self, secret_id: &str) -> Option<VersionStages> {
        let store = self.store.read().await;
        store.get(secret_id).map(|entry| {
            entry
                .versions
                .iter()
                .map(|(id, version)| (id.clone(), version.stages.clone()))
                .collect()
        })
    }

    /// Stored payload of a specific version
    pub async fn secret_string(&self, secret_id: &str, version_id: &str) -> Option<String> {
        let store = self.store.read().await;
        store
            .get(secret_id)?
            .versions
            .get(version_id)?
            .secret_string
            .clone()
    }

    /// Number of versions stored for a secret
    pub async fn version_count(&self, secret_id: &str) -> usize {
        let store = self.store.read().await;
        store.get(secret_id).map_or(0, |entry| entry.versions.len())
    }
}

#[async_trait]
impl SecretStoreProvider for InMemorySecretStore {
    async fn describe_version_stages(&self, secret_id: &str) -> Result<VersionStages, StoreError> {
        let store = self.store.read().await;
        let entry = store
            .get(secret_id)
            .ok_or_else(|| StoreError::NotFound(format!("secret {secret_id}")))?;

        // Unlabelled versions are deprecated and not reported, as in the service
        Ok(entry
            .versions
            .iter()
            .filter(|(_, version)| !version.stages.is_empty())
            .map(|(id, version)| (id.clone(), version.stages.clone()))
            .collect())
    }

    async fn get_secret_value(
        &self,
        secret_id: &str,
        stage: &str,
        version_id: Option<&str>,
    ) -> Result<StoredSecret, StoreError> {
        let store = self.store.read().await;
        let entry = store
            .get(secret_id)
            .ok_or_else(|| StoreError::NotFound(format!("secret {secret_id}")))?;

        let not_found = || {
            StoreError::NotFound(format!(
                "no value for secret {secret_id} with stage {stage} and version {}",
                version_id.unwrap_or("<any>")
            ))
        };

        let (id, version) = entry
            .versions
            .iter()
            .find(|(id, version)| {
                version.stages.contains(stage) && version_id.is_none_or(|wanted| wanted == *id)
            })
            .ok_or_else(not_found)?;

        // A registered-but-unwritten version has no value yet
        let secret_string = version.secret_string.clone().ok_or_else(not_found)?;

        Ok(StoredSecret {
            version_id: id.clone(),
            secret_string: Some(secret_string),
        })
    }

    async fn put_secret_value(
        &self,
        secret_id: &str,
        token: &str,
        secret_string: &str,
        stages: &[&str],
    ) -> Result<(), StoreError> {
        let mut store = self.store.write().await;
        let entry = store
            .get_mut(secret_id)
            .ok_or_else(|| StoreError::NotFound(format!("secret {secret_id}")))?;

        let version = entry.versions.entry(token.to_string()).or_default();
        if let Some(existing) = &version.secret_string {
            if existing == secret_string {
                debug!("Version {} of {} already holds this value", token, secret_id);
                return Ok(());
            }
            return Err(StoreError::AlreadyExists(format!(
                "version {token} of secret {secret_id} already exists with a different value"
            )));
        }
        version.secret_string = Some(secret_string.to_string());

        for stage in stages {
            entry.attach_exclusive(stage, token);
        }
        debug!("Stored version {} of secret {}", token, secret_id);
        Ok(())
    }

    async fn update_version_stage(
        &self,
        secret_id: &str,
        stage: &str,
        move_to: &str,
        remove_from: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut store = self.store.write().await;
        let entry = store
            .get_mut(secret_id)
            .ok_or_else(|| StoreError::NotFound(format!("secret {secret_id}")))?;

        if !entry.versions.contains_key(move_to) {
            return Err(StoreError::NotFound(format!(
                "version {move_to} of secret {secret_id}"
            )));
        }

        let holder = entry.holder_of(stage);
        match (holder.as_deref(), remove_from) {
            (Some(current), Some(from)) if current != from => {
                return Err(StoreError::InvalidRequest(format!(
                    "stage {stage} is attached to {current}, not {from}"
                )));
            }
            (None, Some(from)) => {
                return Err(StoreError::InvalidRequest(format!(
                    "stage {stage} is not attached to {from}"
                )));
            }
            (Some(current), None) if current != move_to => {
                return Err(StoreError::InvalidRequest(format!(
                    "stage {stage} is attached to {current}; remove_from must name it"
                )));
            }
            _ => {}
        }

        entry.attach_exclusive(stage, move_to);

        if stage == STAGE_CURRENT {
            if let Some(demoted) = holder.filter(|id| id != move_to) {
                entry.attach_exclusive(STAGE_PREVIOUS, &demoted);
            }
            if let Some(promoted) = entry.versions.get_mut(move_to) {
                promoted.stages.remove(STAGE_PENDING);
            }
        }

        debug!("Moved {} to version {} of secret {}", stage, move_to, secret_id);
        Ok(())
    }
}
