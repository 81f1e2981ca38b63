//! Outcome of waiting on a materialization job

use serde::{Deserialize, Serialize};

use super::build::{BuildStatus, JobStatus, StatusClass};

/// Terminal result of a wait
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome {
    Success,
    Failure {
        status: JobStatus,
        message: Option<String>,
    },
}

impl PollOutcome {
    /// Map a status payload to an outcome, or `None` while it is still pending
    pub fn from_status(status: BuildStatus) -> Option<Self> {
        match status.status.class() {
            StatusClass::Pending => None,
            StatusClass::Success => Some(PollOutcome::Success),
            StatusClass::Failure => Some(PollOutcome::Failure {
                status: status.status,
                message: status.message,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Success)
    }
}
