//! gifwall entry point.
//!
//! Logging goes to stderr as JSON so stdout stays clean for the rendered
//! wall and command output.

use anyhow::{Context, Result};
use clap::Parser;
use gifwall_cli::cache_cmd;
use gifwall_cli::cli::{Cli, Command};
use gifwall_cli::page;
use gifwall_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("failed to load configuration")?;
    cli.apply_to(&mut config);
    config.validate().context("invalid configuration")?;

    tracing::info!("starting gifwall with store db at {}", config.db_path.display());

    match &cli.command {
        Some(Command::Cache(command)) => cache_cmd::run(command, &config).await,
        None => page::run(&config, cli.offline).await,
    }
}
