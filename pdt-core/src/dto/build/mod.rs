//! Build DTOs for the analytics API

use serde::{Deserialize, Serialize};

/// Parameters of a PDT build request
///
/// Everything here is passed through to the service unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartBuild {
    /// Model containing the view
    pub model: String,
    /// View whose derived table is materialized
    pub view: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_rebuild: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_full_incremental: Option<bool>,
    /// Workspace to build in (e.g. "dev")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
}

impl StartBuild {
    pub fn new(model: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            view: view.into(),
            force_rebuild: None,
            force_full_incremental: None,
            workspace: None,
        }
    }

    pub fn force_rebuild(mut self, value: bool) -> Self {
        self.force_rebuild = Some(value);
        self
    }

    pub fn force_full_incremental(mut self, value: bool) -> Self {
        self.force_full_incremental = Some(value);
        self
    }

    pub fn workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }
}

/// Response of the start/status/stop endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterializePdt {
    pub materialization_id: Option<String>,
    /// JSON document describing the job's status
    pub resp_text: Option<String>,
}

/// Response of the versions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiVersions {
    pub looker_release_version: String,
}

/// Response of the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: Option<String>,
    /// Lifetime of the token in seconds
    pub expires_in: Option<u64>,
}
