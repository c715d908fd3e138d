//! # Rotation
//!
//! Four-step rotation of a versioned secret:
//!
//! 1. `createSecret` - write a candidate version labelled `AWSPENDING`
//! 2. `setSecret` - propagate the candidate downstream (nothing to do here)
//! 3. `testSecret` - check the candidate before it may become current
//! 4. `finishSecret` - move `AWSCURRENT` onto the candidate
//!
//! Each step may be delivered more than once. The guard clauses in the
//! dispatcher, generator, and promoter make every repeat a no-op.

use crate::error::RotationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod coordinator;
pub mod generator;
pub mod payload;
pub mod promoter;
pub mod setter;
pub mod validator;

pub use coordinator::RotationCoordinator;
pub use payload::SecretPayload;

/// The four rotation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationStep {
    CreateSecret,
    SetSecret,
    TestSecret,
    FinishSecret,
}

impl RotationStep {
    /// Step name as sent by the orchestrator
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationStep::CreateSecret => "createSecret",
            RotationStep::SetSecret => "setSecret",
            RotationStep::TestSecret => "testSecret",
            RotationStep::FinishSecret => "finishSecret",
        }
    }
}

impl FromStr for RotationStep {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createSecret" => Ok(RotationStep::CreateSecret),
            "setSecret" => Ok(RotationStep::SetSecret),
            "testSecret" => Ok(RotationStep::TestSecret),
            "finishSecret" => Ok(RotationStep::FinishSecret),
            other => Err(RotationError::UnknownStep(other.to_string())),
        }
    }
}

impl fmt::Display for RotationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rotation step invocation
///
/// Field names match the orchestrator's event payload, so an event document
/// deserializes directly. Extra event fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RotationRequest {
    /// Secret name or ARN
    pub secret_id: String,
    /// Version id of the candidate; correlates the steps of one cycle
    pub client_request_token: String,
    /// Step name; parsed by the dispatcher so unknown names fail as a rotation error
    pub step: String,
}

impl RotationRequest {
    pub fn new(
        secret_id: impl Into<String>,
        client_request_token: impl Into<String>,
        step: impl Into<String>,
    ) -> Self {
        Self {
            secret_id: secret_id.into(),
            client_request_token: client_request_token.into(),
            step: step.into(),
        }
    }
}

/// How a successful step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step did its work
    Completed,
    /// The token's version already holds `AWSCURRENT`; nothing left to do
    AlreadyCurrent,
    /// The step had nothing to do (candidate already written, or no downstream system)
    Skipped,
}

impl StepOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StepOutcome::Completed => "completed",
            StepOutcome::AlreadyCurrent => "already_current",
            StepOutcome::Skipped => "skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names_parse() {
        for step in [
            RotationStep::CreateSecret,
            RotationStep::SetSecret,
            RotationStep::TestSecret,
            RotationStep::FinishSecret,
        ] {
            assert_eq!(step.as_str().parse::<RotationStep>().ok(), Some(step));
        }
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        let err = "rollbackSecret"
            .parse::<RotationStep>()
            .expect_err("not a rotation step");
        assert!(matches!(err, RotationError::UnknownStep(ref name) if name == "rollbackSecret"));
        assert_eq!(err.to_string(), "Unknown rotation step 'rollbackSecret'");
    }

    #[test]
    fn test_step_names_are_case_sensitive() {
        assert!("CreateSecret".parse::<RotationStep>().is_err());
    }

    #[test]
    fn test_request_deserializes_from_event() {
        let event = serde_json::json!({
            "SecretId": "arn:aws:secretsmanager:eu-west-1:123456789012:secret:app-config",
            "ClientRequestToken": "7f0c6a52-2f59-4b9e-9e39-3f0d6f0c8a11",
            "Step": "createSecret",
            "RotationToken": "ignored"
        });
        let request: RotationRequest = serde_json::from_value(event).expect("valid event");
        assert_eq!(request.client_request_token, "7f0c6a52-2f59-4b9e-9e39-3f0d6f0c8a11");
        assert_eq!(request.step, "createSecret");
    }
}
