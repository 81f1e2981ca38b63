//! Error types for the controller

use std::time::Duration;

use pdt_client::ClientError;
use pdt_core::domain::build::{JobStatus, MaterializationId};
use pdt_core::domain::outcome::PollOutcome;
use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, ControllerError>;

#[derive(Debug, Error)]
pub enum ControllerError {
    /// A remote call failed; the client error is passed through as-is
    #[error(transparent)]
    Transport(#[from] ClientError),

    /// The job reached a failure status
    #[error(
        "PDT materialization job {materialization_id} ended with status `{status}`{}",
        describe(.message)
    )]
    JobFailed {
        materialization_id: MaterializationId,
        status: JobStatus,
        message: Option<String>,
    },

    /// The job did not finish within the configured wait timeout
    #[error("PDT materialization job {materialization_id} not finished after {timeout:?}")]
    TimedOut {
        materialization_id: MaterializationId,
        timeout: Duration,
    },

    /// The service is too old to run PDT builds
    #[error("PDT builds require release {required} or later, found {found}")]
    UnsupportedVersion {
        found: String,
        required: &'static str,
    },
}

fn describe(message: &Option<String>) -> String {
    match message.as_deref() {
        Some(message) if !message.is_empty() => format!(": \"{}\"", message),
        _ => String::new(),
    }
}

impl ControllerError {
    /// Diagnostic text attached to a failed job, if any
    pub fn job_message(&self) -> Option<&str> {
        match self {
            ControllerError::JobFailed { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ControllerError::Transport(_))
    }
}

/// Turns a wait outcome into the error surface of [`ControllerError`]
pub trait PollOutcomeExt {
    fn into_result(self, materialization_id: &MaterializationId) -> Result<()>;
}

impl PollOutcomeExt for PollOutcome {
    fn into_result(self, materialization_id: &MaterializationId) -> Result<()> {
        match self {
            PollOutcome::Success => Ok(()),
            PollOutcome::Failure { status, message } => Err(ControllerError::JobFailed {
                materialization_id: materialization_id.clone(),
                status,
                message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_failed_display() {
        let err = ControllerError::JobFailed {
            materialization_id: MaterializationId::new("test-id"),
            status: JobStatus::Error,
            message: Some("test".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "PDT materialization job test-id ended with status `error`: \"test\""
        );
        assert_eq!(err.job_message(), Some("test"));

        let err = ControllerError::JobFailed {
            materialization_id: MaterializationId::new("test-id"),
            status: JobStatus::Cancelled,
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "PDT materialization job test-id ended with status `killed`"
        );
    }

    #[test]
    fn test_transport_is_transparent() {
        let err: ControllerError = ClientError::api_error(502, "bad gateway").into();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "API error (status 502): bad gateway");
    }

    #[test]
    fn test_outcome_into_result() {
        let id = MaterializationId::new("x");
        assert!(PollOutcome::Success.into_result(&id).is_ok());

        let err = PollOutcome::Failure {
            status: JobStatus::Unknown,
            message: None,
        }
        .into_result(&id)
        .unwrap_err();
        assert!(matches!(
            err,
            ControllerError::JobFailed {
                status: JobStatus::Unknown,
                ..
            }
        ));
    }
}
