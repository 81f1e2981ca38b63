//! pdtctl
//!
//! Command-line interface for starting, stopping and watching PDT
//! materialization jobs.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::{Config, ConnectionArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pdtctl")]
#[command(about = "PDT materialization job control", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Tag attributing start/stop requests to the caller
    #[arg(long, env = "PDT_SOURCE")]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdtctl=info,pdt_controller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        connection: cli.connection.into_settings()?,
        source: cli.source,
    };

    handle_command(cli.command, &config).await
}
