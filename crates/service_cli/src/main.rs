//! Neutryx CLI - Vega Bump Partition Tooling
//!
//! Command-line entry point for building and checking vega bump partitions
//! of a pseudo-root market model.
//!
//! # Commands
//!
//! - `neutryx bumps generate [--factorwise]` - Print the canonical partition
//! - `neutryx bumps check` - Validate the partition listed in the config file
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate reads a TOML configuration,
//! builds the model through `pricer_models` and hands the partition work to
//! `pricer_risk::vega`.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::CliConfig;

/// Neutryx vega bump partition CLI
#[derive(Parser)]
#[command(name = "neutryx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "neutryx.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Vega bump partitions of the configured market model
    Bumps {
        #[command(subcommand)]
        action: BumpsAction,
    },
}

#[derive(Subcommand)]
enum BumpsAction {
    /// Generate the canonical partition
    Generate {
        /// One cluster per factor instead of one per (rate, step)
        #[arg(long)]
        factorwise: bool,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Check the partition listed under [[bumps.clusters]]
    Check {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config = CliConfig::load(&cli.config)?;

    match cli.command {
        Commands::Bumps { action } => match action {
            BumpsAction::Generate { factorwise, format } => {
                commands::bumps::run_generate(&config, factorwise, &format)
            }
            BumpsAction::Check { format } => commands::bumps::run_check(&config, &format),
        },
    }
}
