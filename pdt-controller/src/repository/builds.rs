//! Builds repository
//!
//! Handles communication with the analytics API for PDT builds:
//! - Reading the service's release version
//! - Starting builds
//! - Checking build status
//! - Stopping builds

use async_trait::async_trait;
use pdt_client::{ClientError, ConnectionSettings, LookerClient, Result};
use pdt_core::domain::build::{BuildStatus, MaterializationId};
use pdt_core::dto::build::{MaterializePdt, StartBuild};

/// Remote operations on PDT builds
#[async_trait]
pub trait BuildRepository: Send + Sync {
    /// Release version of the service (e.g. "24.6.12")
    async fn release_version(&self) -> Result<String>;

    /// Starts a build
    ///
    /// # Arguments
    /// * `req` - Model, view and build flags, passed through unchanged
    /// * `source` - Tag identifying the calling software
    async fn start_build(&self, req: &StartBuild, source: &str) -> Result<MaterializationId>;

    /// Reads the current status of a build
    async fn build_status(&self, id: &MaterializationId) -> Result<BuildStatus>;

    /// Requests cancellation of a build
    ///
    /// # Arguments
    /// * `id` - The build to stop
    /// * `source` - Tag identifying the calling software
    async fn stop_build(&self, id: &MaterializationId, source: &str) -> Result<()>;
}

/// HTTP implementation of BuildRepository
#[derive(Debug, Clone)]
pub struct HttpBuildRepository {
    client: LookerClient,
}

impl HttpBuildRepository {
    pub fn new(client: LookerClient) -> Self {
        Self { client }
    }

    /// Creates a repository with its own client
    ///
    /// # Arguments
    /// * `settings` - Connection settings for the analytics API
    pub fn from_settings(settings: ConnectionSettings) -> Result<Self> {
        Ok(Self::new(LookerClient::new(settings)?))
    }
}

#[async_trait]
impl BuildRepository for HttpBuildRepository {
    async fn release_version(&self) -> Result<String> {
        let versions = self.client.versions().await?;
        Ok(versions.looker_release_version)
    }

    async fn start_build(&self, req: &StartBuild, source: &str) -> Result<MaterializationId> {
        let response = self.client.start_pdt_build(req, source).await?;
        materialization_id_of(response)
    }

    async fn build_status(&self, id: &MaterializationId) -> Result<BuildStatus> {
        self.client.pdt_build_status(id).await
    }

    async fn stop_build(&self, id: &MaterializationId, source: &str) -> Result<()> {
        self.client.stop_pdt_build(id, source).await?;
        Ok(())
    }
}

/// Id of a started build; a response without one is a protocol error
fn materialization_id_of(response: MaterializePdt) -> Result<MaterializationId> {
    response
        .materialization_id
        .map(MaterializationId::from)
        .ok_or_else(|| {
            ClientError::ParseError("start response has no materialization_id".to_string())
        })
}
