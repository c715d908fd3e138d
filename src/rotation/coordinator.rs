//! # Rotation Coordinator
//!
//! Single entry point for rotation steps. Checks the request token against
//! fresh version metadata, then routes to the step handler.

use super::{generator, promoter, setter, validator, RotationRequest, RotationStep, StepOutcome};
use crate::constants::{STAGE_CURRENT, STAGE_PENDING};
use crate::error::{RotationError, RotationResult};
use crate::observability::metrics;
use crate::provider::SecretStoreProvider;
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};

/// Dispatches rotation steps against an injected secret store
///
/// Holds no state besides the store handle; every call re-reads metadata.
#[derive(Debug, Clone)]
pub struct RotationCoordinator<P> {
    provider: P,
}

impl<P: SecretStoreProvider> RotationCoordinator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The store this coordinator talks to
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one rotation step
    ///
    /// # Errors
    ///
    /// Any [`RotationError`] means the step failed and must not be advanced
    /// past. Nothing is rolled back; a pending candidate left behind is
    /// picked up by the next retry.
    pub async fn rotate(&self, request: &RotationRequest) -> RotationResult<StepOutcome> {
        let span = info_span!(
            "rotation.step",
            secret.id = %request.secret_id,
            step = %request.step,
            token = %request.client_request_token
        );
        let start = Instant::now();

        async move {
            info!("Handling rotation step");
            let result = self.dispatch(request).await;
            let outcome = match &result {
                Ok(outcome) => {
                    info!(outcome = outcome.as_str(), "Rotation step finished");
                    outcome.as_str()
                }
                Err(e) => {
                    error!(error = %e, "Rotation step failed");
                    "failed"
                }
            };
            metrics::record_step(&request.step, outcome, start.elapsed().as_secs_f64());
            result
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, request: &RotationRequest) -> RotationResult<StepOutcome> {
        let secret_id = request.secret_id.as_str();
        let token = request.client_request_token.as_str();

        let versions = self.provider.describe_version_stages(secret_id).await?;

        let Some(stages) = versions.get(token) else {
            return Err(RotationError::TokenNotFound {
                secret_id: secret_id.to_string(),
                token: token.to_string(),
            });
        };
        if stages.contains(STAGE_CURRENT) {
            info!("Secret version already marked as current; no action needed");
            return Ok(StepOutcome::AlreadyCurrent);
        }
        if !stages.contains(STAGE_PENDING) {
            return Err(RotationError::NotPending {
                secret_id: secret_id.to_string(),
                token: token.to_string(),
            });
        }

        // Routed only once the token is known to be pending
        let step: RotationStep = request.step.parse()?;
        match step {
            RotationStep::CreateSecret => {
                generator::create_secret(&self.provider, secret_id, token).await
            }
            RotationStep::SetSecret => Ok(setter::set_secret(secret_id, token)),
            RotationStep::TestSecret => validator::test_secret(&self.provider, secret_id, token).await,
            RotationStep::FinishSecret => {
                promoter::finish_secret(&self.provider, secret_id, token, &versions).await
            }
        }
    }
}
