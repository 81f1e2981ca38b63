//! Build command handlers
//!
//! Starts, stops, inspects and waits on PDT builds.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use pdt_controller::{ControllerError, JobController, WaitConfig};
use pdt_core::domain::build::{BuildStatus, JobStatus, MaterializationId, StatusClass};
use pdt_core::dto::build::StartBuild;
use tracing::warn;

/// What to build
#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Model containing the view
    #[arg(long)]
    model: String,

    /// View whose derived table is materialized
    #[arg(long)]
    view: String,

    /// Rebuild even if the table is up to date
    #[arg(long)]
    force_rebuild: bool,

    /// Rebuild incremental tables from scratch
    #[arg(long)]
    force_full_incremental: bool,

    /// Workspace to build in (e.g. "dev")
    #[arg(long)]
    workspace: Option<String>,
}

impl StartArgs {
    fn into_request(self) -> StartBuild {
        let mut req = StartBuild::new(self.model, self.view);
        if self.force_rebuild {
            req = req.force_rebuild(true);
        }
        if self.force_full_incremental {
            req = req.force_full_incremental(true);
        }
        if let Some(workspace) = self.workspace {
            req = req.workspace(workspace);
        }
        req
    }
}

/// How to wait; unset flags fall back to PDT_* environment variables
#[derive(Args, Debug, Clone, Default)]
pub struct WaitArgs {
    /// Seconds between status checks
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Leave the build running when the timeout fires
    #[arg(long)]
    no_stop_on_timeout: bool,
}

impl WaitArgs {
    fn to_config(&self) -> Result<WaitConfig> {
        self.apply_to(WaitConfig::from_env()?)
    }

    /// Overrides `config` with the flags that were given, then validates the result
    fn apply_to(&self, mut config: WaitConfig) -> Result<WaitConfig> {
        if let Some(secs) = self.poll_interval {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout {
            config.timeout = Some(Duration::from_secs(secs));
        }
        if self.no_stop_on_timeout {
            config.stop_on_timeout = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Start a build and print its id
pub async fn start(controller: &JobController, args: StartArgs) -> Result<()> {
    let id = controller
        .start(args.into_request())
        .await
        .context("Failed to start PDT build")?;

    println!("{} {}", "✓ Started PDT build".green(), id.to_string().cyan());
    Ok(())
}

/// Stop a build
pub async fn stop(controller: &JobController, id: &str) -> Result<()> {
    let id = MaterializationId::new(id);
    controller
        .stop(&id)
        .await
        .with_context(|| format!("Failed to stop PDT build {}", id))?;

    println!("{} {}", "✓ Stop requested for".green(), id.to_string().cyan());
    Ok(())
}

/// Show the status of a build
pub async fn status(controller: &JobController, id: &str) -> Result<()> {
    let id = MaterializationId::new(id);
    let status = controller
        .query_status(&id)
        .await
        .with_context(|| format!("Failed to get status of PDT build {}", id))?;

    print_status(&id, &status);
    Ok(())
}

/// Wait for an already started build
pub async fn wait(controller: &JobController, id: &str, args: &WaitArgs) -> Result<()> {
    let config = args.to_config()?;
    let id = MaterializationId::new(id);

    wait_interruptibly(controller, &id, &config).await
}

/// Start a build, then wait for it unless asked not to
pub async fn start_and_wait(
    controller: &JobController,
    args: StartArgs,
    asynchronous: bool,
    wait_args: &WaitArgs,
) -> Result<()> {
    let config = wait_args.to_config()?;
    let id = controller
        .start(args.into_request())
        .await
        .context("Failed to start PDT build")?;

    println!("{} {}", "✓ Started PDT build".green(), id.to_string().cyan());

    if asynchronous {
        return Ok(());
    }

    wait_interruptibly(controller, &id, &config).await
}

/// Wait for a build; Ctrl-C stops the remote build before exiting
async fn wait_interruptibly(
    controller: &JobController,
    id: &MaterializationId,
    config: &WaitConfig,
) -> Result<()> {
    println!(
        "{}",
        format!("Waiting for PDT build {} (every {:?})...", id, config.poll_interval).dimmed()
    );

    tokio::select! {
        result = controller.wait_for_job(id, config) => report(id, result),
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            warn!("Interrupted, stopping PDT build {}", id);
            controller
                .stop(id)
                .await
                .with_context(|| format!("Failed to stop PDT build {}", id))?;
            anyhow::bail!("interrupted; stop requested for PDT build {}", id)
        }
    }
}

fn report(id: &MaterializationId, result: pdt_controller::Result<()>) -> Result<()> {
    match result {
        Ok(()) => {
            println!("{} {}", "✓ PDT build finished:".green(), id.to_string().cyan());
            Ok(())
        }
        Err(e @ ControllerError::JobFailed { .. }) => {
            println!("{} {}", "✗ PDT build failed:".red(), id.to_string().cyan());
            if let Some(message) = e.job_message() {
                println!("{}", message.red());
            }
            Err(e.into())
        }
        Err(e) => Err(
            anyhow::Error::new(e).context(format!("Failed waiting for PDT build {}", id)),
        ),
    }
}

fn print_status(id: &MaterializationId, status: &BuildStatus) {
    println!("{}", "PDT Build:".bold());
    println!("  ID:      {}", id.to_string().cyan());
    println!("  Status:  {}", colorize_status(&status.status));
    if let Some(message) = &status.message {
        println!("  Message: {}", message);
    }
}

/// Colorize job status for display
fn colorize_status(status: &JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status.class() {
        StatusClass::Pending => status_str.yellow(),
        StatusClass::Success => status_str.green(),
        StatusClass::Failure if *status == JobStatus::Cancelled => status_str.dimmed(),
        StatusClass::Failure => status_str.red(),
    }
}
