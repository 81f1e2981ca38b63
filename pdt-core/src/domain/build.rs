//! Materialization job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a remote materialization job
///
/// Assigned by the service when a build is started and required by every
/// subsequent stop/status call. Never reused across jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterializationId(String);

impl MaterializationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterializationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MaterializationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MaterializationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Coarse phase of a job, derived from its [`JobStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Not finished yet, keep polling
    Pending,
    /// Finished successfully
    Success,
    /// Finished unsuccessfully, or in a state we do not understand
    Failure,
}

impl StatusClass {
    pub fn is_terminal(self) -> bool {
        !matches!(self, StatusClass::Pending)
    }
}

/// Status reported by the service for a materialization job
///
/// The service speaks `new`/`running`/`complete`/`error`/`killed`/`unknown`.
/// Generic spellings (`pending`, `success`, `failed`, `cancelled`) are accepted
/// as well. Anything else is kept verbatim in [`JobStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Running,
    Complete,
    Error,
    Cancelled,
    Unknown,
    Other(String),
}

impl JobStatus {
    /// Parse a raw status value, case-insensitively
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "new" | "pending" => JobStatus::Pending,
            "running" => JobStatus::Running,
            "complete" | "done" | "success" => JobStatus::Complete,
            "error" | "failed" => JobStatus::Error,
            "killed" | "cancelled" | "canceled" => JobStatus::Cancelled,
            "unknown" => JobStatus::Unknown,
            _ => JobStatus::Other(raw.to_string()),
        }
    }

    /// Wire spelling of this status
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "new",
            JobStatus::Running => "running",
            JobStatus::Complete => "complete",
            JobStatus::Error => "error",
            JobStatus::Cancelled => "killed",
            JobStatus::Unknown => "unknown",
            JobStatus::Other(raw) => raw,
        }
    }

    /// Classify this status.
    ///
    /// Only `Pending` and `Running` keep a wait loop going. Every value that
    /// is not explicitly a success, including unrecognized ones, is a failure
    /// so that polling always terminates on something we cannot interpret.
    pub fn class(&self) -> StatusClass {
        match self {
            JobStatus::Pending | JobStatus::Running => StatusClass::Pending,
            JobStatus::Complete => StatusClass::Success,
            JobStatus::Error | JobStatus::Cancelled | JobStatus::Unknown | JobStatus::Other(_) => {
                StatusClass::Failure
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.class().is_terminal()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        JobStatus::parse(&raw)
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        JobStatus::parse(raw)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Decoded status payload of a materialization job
///
/// The service returns this as a JSON document embedded in the `resp_text`
/// field of its response. `message` is usually present only for failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatus {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BuildStatus {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Decode the JSON status document carried in `resp_text`
    pub fn from_resp_text(resp_text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(resp_text)
    }
}
