//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod build;

use anyhow::Result;
use clap::Subcommand;

pub use build::{StartArgs, WaitArgs};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start a PDT build and print its materialization id
    Start {
        #[command(flatten)]
        build: StartArgs,
    },
    /// Stop a running PDT build
    Stop {
        /// Materialization id
        id: String,
    },
    /// Show the current status of a PDT build
    Status {
        /// Materialization id
        id: String,
    },
    /// Wait for a PDT build to finish
    Wait {
        /// Materialization id
        id: String,

        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Start a PDT build and wait for it to finish
    Build {
        #[command(flatten)]
        build: StartArgs,

        /// Return right after starting instead of waiting
        #[arg(long)]
        asynchronous: bool,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

/// Handle a CLI command
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let controller = config.controller()?;

    match command {
        Commands::Start { build } => build::start(&controller, build).await,
        Commands::Stop { id } => build::stop(&controller, &id).await,
        Commands::Status { id } => build::status(&controller, &id).await,
        Commands::Wait { id, wait } => build::wait(&controller, &id, &wait).await,
        Commands::Build {
            build,
            asynchronous,
            wait,
        } => build::start_and_wait(&controller, build, asynchronous, &wait).await,
    }
}
