//! Episodic CLI - guest account maintenance from the command line
//!
//! Preview, check and run guest-to-user merges against a database file.

mod cli;
mod commands;
mod error;

#[cfg(test)]
mod tests;

use clap::Parser;
use episodic_core::MergeConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::can_merge::run_can_merge;
use crate::commands::common::resolve_db_path;
use crate::commands::merge::run_merge;
use crate::commands::preview::run_preview;
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("episodic=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let mut config = MergeConfig::from_env()?;
    tracing::debug!("Using database at {}", db_path.display());

    match cli.command {
        Commands::Preview { guest, json } => run_preview(guest, json, &db_path, &config)?,
        Commands::CanMerge { guest } => run_can_merge(guest, &db_path, &config)?,
        Commands::Merge {
            guest,
            target,
            strategy,
            json,
        } => {
            if let Some(strategy) = strategy {
                config.strategy = strategy.into();
            }
            run_merge(guest, target, json, &db_path, &config)?;
        }
    }

    Ok(())
}
