//! Job controller
//!
//! Starts, stops and inspects PDT builds, and waits for a build to reach a
//! terminal status by polling it on an interval.

use std::sync::Arc;
use std::time::Duration;

use pdt_core::domain::build::{BuildStatus, MaterializationId};
use pdt_core::domain::outcome::PollOutcome;
use pdt_core::dto::build::StartBuild;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::config::WaitConfig;
use crate::error::{ControllerError, PollOutcomeExt, Result};
use crate::repository::BuildRepository;
use crate::version;

/// Tag sent with start and stop requests to attribute them to this software
pub fn default_source() -> String {
    format!("pdtctl:{}", env!("CARGO_PKG_VERSION"))
}

/// Controller for remote PDT materialization jobs
///
/// Holds no per-job state. Clones share the underlying repository.
#[derive(Clone)]
pub struct JobController {
    repository: Arc<dyn BuildRepository>,
    source: String,
    check_version: bool,
}

impl JobController {
    /// Creates a controller using [`default_source`] and release version gating
    pub fn new(repository: Arc<dyn BuildRepository>) -> Self {
        Self {
            repository,
            source: default_source(),
            check_version: true,
        }
    }

    /// Overrides the client-identifying tag
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Skips the release version check before starting builds
    pub fn without_version_check(mut self) -> Self {
        self.check_version = false;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Starts a build
    ///
    /// Parameters are passed through unchanged; calling this twice starts two
    /// builds.
    ///
    /// # Returns
    /// The id assigned by the service
    pub async fn start(&self, req: StartBuild) -> Result<MaterializationId> {
        if self.check_version {
            let release = self.repository.release_version().await?;
            version::ensure_supported(&release)?;
            debug!("Service release {} supports PDT builds", release);
        }

        let id = self.repository.start_build(&req, &self.source).await?;
        info!("Started PDT materialization {} for {}.{}", id, req.model, req.view);

        Ok(id)
    }

    /// Requests cancellation of a build
    ///
    /// The service decides what stopping a finished build means; this call
    /// does not check the status first.
    pub async fn stop(&self, id: &MaterializationId) -> Result<()> {
        self.repository.stop_build(id, &self.source).await?;
        info!("Requested stop of PDT materialization {}", id);
        Ok(())
    }

    /// Reads the current status of a build
    pub async fn query_status(&self, id: &MaterializationId) -> Result<BuildStatus> {
        Ok(self.repository.build_status(id).await?)
    }

    /// Polls a build until it reaches a terminal status
    ///
    /// The wait is unbounded; see [`await_completion_with`](Self::await_completion_with)
    /// for a deadline.
    pub async fn await_completion(
        &self,
        id: &MaterializationId,
        poll_interval: Duration,
    ) -> Result<PollOutcome> {
        self.await_completion_with(id, &WaitConfig::new(poll_interval)).await
    }

    /// Polls a build until it reaches a terminal status or the configured timeout
    ///
    /// Statuses that are neither pending nor a success end the wait with a
    /// failure outcome, including ones the controller does not recognize. A
    /// transport error from any status check ends the wait immediately.
    pub async fn await_completion_with(
        &self,
        id: &MaterializationId,
        config: &WaitConfig,
    ) -> Result<PollOutcome> {
        let started = Instant::now();
        let mut polls: u64 = 0;

        loop {
            let status = self.query_status(id).await?;
            polls += 1;

            let current = status.status.clone();
            if let Some(outcome) = PollOutcome::from_status(status) {
                match &outcome {
                    PollOutcome::Success => info!(
                        "PDT materialization {} completed after {} check(s)",
                        id, polls
                    ),
                    PollOutcome::Failure { status, message } => warn!(
                        "PDT materialization {} ended with status {}: {}",
                        id,
                        status,
                        message.as_deref().unwrap_or("")
                    ),
                }
                return Ok(outcome);
            }

            debug!("PDT materialization {} is {} (check {})", id, current, polls);

            let mut delay = config.poll_interval;
            if let Some(timeout) = config.timeout {
                let elapsed = started.elapsed();
                if elapsed >= timeout {
                    return Err(self.give_up(id, timeout, config.stop_on_timeout).await);
                }
                delay = delay.min(timeout - elapsed);
            }

            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                time::sleep(delay).await;
            }
        }
    }

    /// Waits for a build and turns a failure outcome into [`ControllerError::JobFailed`]
    pub async fn wait_for_job(&self, id: &MaterializationId, config: &WaitConfig) -> Result<()> {
        self.await_completion_with(id, config)
            .await?
            .into_result(id)
    }

    async fn give_up(
        &self,
        id: &MaterializationId,
        timeout: Duration,
        stop: bool,
    ) -> ControllerError {
        warn!("PDT materialization {} not finished after {:?}, giving up", id, timeout);

        if stop {
            if let Err(e) = self.stop(id).await {
                warn!("Failed to stop PDT materialization {}: {}", id, e);
            }
        }

        ControllerError::TimedOut {
            materialization_id: id.clone(),
            timeout,
        }
    }
}
