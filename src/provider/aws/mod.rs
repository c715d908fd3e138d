//! # AWS Secrets Manager Client
//!
//! Client for the four Secrets Manager calls a rotation needs:
//! - `DescribeSecret` for the version -> staging label map
//! - `GetSecretValue` by stage and optional version
//! - `PutSecretValue` with a client request token
//! - `UpdateSecretVersionStage` for the atomic `AWSCURRENT` move

use crate::error::StoreError;
use crate::observability::metrics;
use crate::provider::{SecretStoreProvider, StoredSecret, VersionStages};
use async_trait::async_trait;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use std::time::Instant;
use tracing::{debug, info, warn, Instrument};

/// AWS Secrets Manager provider implementation
pub struct AwsSecretsManager {
    client: SecretsManagerClient,
}

impl std::fmt::Debug for AwsSecretsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretsManager")
            .field("region", &self.client.config().region())
            .finish_non_exhaustive()
    }
}

impl AwsSecretsManager {
    /// Create a client from the default credential chain
    ///
    /// `region` overrides the region discovered from the environment.
    pub async fn new(region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            info!("Using AWS region override: {}", region);
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        let sdk_config = loader.load().await;

        Self::from_client(SecretsManagerClient::new(&sdk_config))
    }

    /// Wrap an already configured SDK client
    #[must_use]
    pub fn from_client(client: SecretsManagerClient) -> Self {
        Self { client }
    }
}

/// Translate an SDK failure into the store taxonomy
fn map_sdk_error<E, R>(operation: &str, err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    metrics::increment_store_errors(operation);
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(&err).to_string(), ToString::to_string);

    match err.code() {
        Some("ResourceNotFoundException") => StoreError::NotFound(message),
        Some("ResourceExistsException") => StoreError::AlreadyExists(message),
        Some("InvalidRequestException" | "InvalidParameterException") => {
            StoreError::InvalidRequest(message)
        }
        _ => {
            warn!(
                operation = operation,
                error = %DisplayErrorContext(&err),
                "Secrets Manager call failed"
            );
            StoreError::Backend(anyhow::Error::new(err).context(format!(
                "Secrets Manager {operation} failed"
            )))
        }
    }
}

#[async_trait]
impl SecretStoreProvider for AwsSecretsManager {
    async fn describe_version_stages(&self, secret_id: &str) -> Result<VersionStages, StoreError> {
        let span = tracing::debug_span!("aws.secret.describe", secret.id = secret_id);
        let start = Instant::now();

        async move {
            metrics::record_store_operation("describe");
            let output = self
                .client
                .describe_secret()
                .secret_id(secret_id)
                .send()
                .await
                .map_err(|e| map_sdk_error("describe", e))?;

            let versions: VersionStages = output
                .version_ids_to_stages()
                .map(|map| {
                    map.iter()
                        .map(|(version, stages)| {
                            (version.clone(), stages.iter().cloned().collect())
                        })
                        .collect()
                })
                .unwrap_or_default();

            debug!(
                versions = versions.len(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Described secret versions"
            );
            Ok(versions)
        }
        .instrument(span)
        .await
    }

    async fn get_secret_value(
        &self,
        secret_id: &str,
        stage: &str,
        version_id: Option<&str>,
    ) -> Result<StoredSecret, StoreError> {
        let span = tracing::debug_span!(
            "aws.secret.get",
            secret.id = secret_id,
            stage = stage,
            version.id = version_id
        );

        async move {
            metrics::record_store_operation("get");
            let output = self
                .client
                .get_secret_value()
                .secret_id(secret_id)
                .version_stage(stage)
                .set_version_id(version_id.map(ToString::to_string))
                .send()
                .await
                .map_err(|e| map_sdk_error("get", e))?;

            Ok(StoredSecret {
                version_id: output
                    .version_id()
                    .or(version_id)
                    .unwrap_or_default()
                    .to_string(),
                secret_string: output.secret_string().map(ToString::to_string),
            })
        }
        .instrument(span)
        .await
    }

    async fn put_secret_value(
        &self,
        secret_id: &str,
        token: &str,
        secret_string: &str,
        stages: &[&str],
    ) -> Result<(), StoreError> {
        let span = tracing::info_span!("aws.secret.put", secret.id = secret_id, version.id = token);

        async move {
            metrics::record_store_operation("put");
            self.client
                .put_secret_value()
                .secret_id(secret_id)
                .client_request_token(token)
                .secret_string(secret_string)
                .set_version_stages(Some(stages.iter().map(ToString::to_string).collect()))
                .send()
                .await
                .map_err(|e| map_sdk_error("put", e))?;

            info!(stages = ?stages, "Stored new secret version");
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn update_version_stage(
        &self,
        secret_id: &str,
        stage: &str,
        move_to: &str,
        remove_from: Option<&str>,
    ) -> Result<(), StoreError> {
        let span = tracing::info_span!(
            "aws.secret.update_stage",
            secret.id = secret_id,
            stage = stage,
            move_to = move_to,
            remove_from = remove_from
        );

        async move {
            metrics::record_store_operation("update_stage");
            self.client
                .update_secret_version_stage()
                .secret_id(secret_id)
                .version_stage(stage)
                .move_to_version_id(move_to)
                .set_remove_from_version_id(remove_from.map(ToString::to_string))
                .send()
                .await
                .map_err(|e| map_sdk_error("update_stage", e))?;

            info!("Moved staging label");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
