//! CLI error types.

use pricer_core::market_model::{EvolutionError, MarketModelError};
use pricer_risk::vega::VegaBumpError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure while reading inputs.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Evolution in the configuration is invalid.
    #[error(transparent)]
    Evolution(#[from] EvolutionError),

    /// Market model in the configuration is invalid.
    #[error(transparent)]
    Model(#[from] MarketModelError),

    /// Vega bump construction or verification failed.
    #[error(transparent)]
    Vega(#[from] VegaBumpError),

    /// JSON output could not be produced.
    #[error("Serialisation error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;
