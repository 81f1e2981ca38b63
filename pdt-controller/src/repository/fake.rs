//! In-memory repository replaying scripted statuses

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use pdt_client::{ClientError, Result};
use pdt_core::domain::build::{BuildStatus, JobStatus, MaterializationId};
use pdt_core::dto::build::StartBuild;

use super::BuildRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ReleaseVersion,
    Start {
        model: String,
        view: String,
        source: String,
    },
    Status(MaterializationId),
    Stop {
        id: MaterializationId,
        source: String,
    },
}

/// Replays one script of status results per job.
///
/// A job whose script is exhausted (or was never scripted) reports
/// `running` forever.
pub(crate) struct ScriptedRepository {
    release: String,
    next_id: String,
    scripts: Mutex<HashMap<MaterializationId, VecDeque<Result<BuildStatus>>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRepository {
    pub(crate) fn new() -> Self {
        Self {
            release: "24.6.0".to_string(),
            next_id: "test-id".to_string(),
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_release(mut self, release: &str) -> Self {
        self.release = release.to_string();
        self
    }

    pub(crate) fn script(self, id: &str, statuses: Vec<Result<BuildStatus>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(MaterializationId::new(id), statuses.into());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn status_calls(&self, id: &str) -> usize {
        let id = MaterializationId::new(id);
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Status(called) if *called == id))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub(crate) fn status(raw: &str) -> Result<BuildStatus> {
    Ok(BuildStatus::new(JobStatus::parse(raw)))
}

pub(crate) fn failed(raw: &str, message: &str) -> Result<BuildStatus> {
    Ok(BuildStatus::new(JobStatus::parse(raw)).with_message(message))
}

pub(crate) fn transport_error() -> Result<BuildStatus> {
    Err(ClientError::api_error(503, "service unavailable"))
}

#[async_trait]
impl BuildRepository for ScriptedRepository {
    async fn release_version(&self) -> Result<String> {
        self.record(Call::ReleaseVersion);
        Ok(self.release.clone())
    }

    async fn start_build(&self, req: &StartBuild, source: &str) -> Result<MaterializationId> {
        self.record(Call::Start {
            model: req.model.clone(),
            view: req.view.clone(),
            source: source.to_string(),
        });
        Ok(MaterializationId::new(self.next_id.clone()))
    }

    async fn build_status(&self, id: &MaterializationId) -> Result<BuildStatus> {
        self.record(Call::Status(id.clone()));
        self.scripts
            .lock()
            .unwrap()
            .get_mut(id)
            .and_then(|script| script.pop_front())
            .unwrap_or_else(|| status("running"))
    }

    async fn stop_build(&self, id: &MaterializationId, source: &str) -> Result<()> {
        self.record(Call::Stop {
            id: id.clone(),
            source: source.to_string(),
        });
        Ok(())
    }
}
