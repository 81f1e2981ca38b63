//! PDT build endpoints

use pdt_core::domain::build::{BuildStatus, MaterializationId};
use pdt_core::dto::build::{ApiVersions, MaterializePdt, StartBuild};

use crate::LookerClient;
use crate::error::{ClientError, Result};

impl LookerClient {
    // =============================================================================
    // Instance
    // =============================================================================

    /// Get the API versions supported by the instance
    ///
    /// # Returns
    /// The version information, including the release version
    pub async fn versions(&self) -> Result<ApiVersions> {
        let url = self.endpoint(["versions"])?;
        self.send_authorized(self.client.get(url)).await
    }

    // =============================================================================
    // Build Lifecycle
    // =============================================================================

    /// Start a PDT materialization
    ///
    /// # Arguments
    /// * `req` - Model, view and optional build flags
    /// * `source` - Tag identifying the calling software
    ///
    /// # Returns
    /// The service's response, carrying the materialization id
    pub async fn start_pdt_build(&self, req: &StartBuild, source: &str) -> Result<MaterializePdt> {
        let url = self.endpoint([
            "derived_table",
            req.model.as_str(),
            req.view.as_str(),
            "start",
        ])?;
        let request = self.client.get(url).query(&start_query(req, source));

        self.send_authorized(request).await
    }

    /// Check a PDT materialization
    ///
    /// # Arguments
    /// * `materialization_id` - Id returned when the build was started
    ///
    /// # Returns
    /// The raw response; see [`pdt_build_status`](Self::pdt_build_status) for
    /// the decoded status
    pub async fn check_pdt_build(
        &self,
        materialization_id: &MaterializationId,
    ) -> Result<MaterializePdt> {
        let url = self.endpoint(["derived_table", materialization_id.as_str(), "status"])?;
        self.send_authorized(self.client.get(url)).await
    }

    /// Get the decoded status of a PDT materialization
    pub async fn pdt_build_status(
        &self,
        materialization_id: &MaterializationId,
    ) -> Result<BuildStatus> {
        let response = self.check_pdt_build(materialization_id).await?;
        decode_status(&response)
    }

    /// Stop a PDT materialization
    ///
    /// # Arguments
    /// * `materialization_id` - Id returned when the build was started
    /// * `source` - Tag identifying the calling software
    pub async fn stop_pdt_build(
        &self,
        materialization_id: &MaterializationId,
        source: &str,
    ) -> Result<MaterializePdt> {
        let url = self.endpoint(["derived_table", materialization_id.as_str(), "stop"])?;
        let request = self.client.get(url).query(&[("source", source)]);

        self.send_authorized(request).await
    }
}

fn start_query(req: &StartBuild, source: &str) -> Vec<(&'static str, String)> {
    let mut query = vec![("source", source.to_string())];
    if let Some(value) = req.force_rebuild {
        query.push(("force_rebuild", value.to_string()));
    }
    if let Some(value) = req.force_full_incremental {
        query.push(("force_full_incremental", value.to_string()));
    }
    if let Some(workspace) = &req.workspace {
        query.push(("workspace", workspace.clone()));
    }
    query
}

/// Decode the status document embedded in a materialization response
pub(crate) fn decode_status(response: &MaterializePdt) -> Result<BuildStatus> {
    let resp_text = response
        .resp_text
        .as_deref()
        .ok_or_else(|| ClientError::ParseError("status response has no resp_text".to_string()))?;

    BuildStatus::from_resp_text(resp_text)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse build status: {}", e)))
}
