//! Market model error types.
//!
//! This module provides structured error handling for evolution descriptions
//! and pseudo-root market model construction.

use thiserror::Error;

/// Errors from building an [`EvolutionDescription`](super::EvolutionDescription).
///
/// # Examples
///
/// ```
/// use pricer_core::market_model::EvolutionError;
///
/// let err = EvolutionError::InsufficientRateTimes { got: 1 };
/// assert_eq!(format!("{}", err), "Insufficient rate times: got 1, need at least 2");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvolutionError {
    /// Fewer than two rate times (at least one rate is required).
    #[error("Insufficient rate times: got {got}, need at least 2")]
    InsufficientRateTimes {
        /// Number of rate times provided
        got: usize,
    },

    /// No evolution step was supplied.
    #[error("Evolution must have at least one step")]
    NoSteps,

    /// A time is negative, zero where positivity is required, or not finite.
    #[error("Invalid {kind} time at index {index}: {value}")]
    InvalidTime {
        /// Which schedule the time belongs to ("rate" or "evolution")
        kind: &'static str,
        /// Position in the schedule
        index: usize,
        /// The offending value
        value: f64,
    },

    /// Times are not strictly increasing.
    #[error("{kind} times must be strictly increasing: index {index} has {value} after {previous}")]
    NotIncreasing {
        /// Which schedule the times belong to ("rate" or "evolution")
        kind: &'static str,
        /// Position of the offending time
        index: usize,
        /// Time preceding the offending time
        previous: f64,
        /// The offending time
        value: f64,
    },

    /// The last step evolves past the reset of the last rate.
    #[error("Last evolution time {last_evolution} is after the last rate reset {last_reset}")]
    EvolutionBeyondLastReset {
        /// Final evolution time
        last_evolution: f64,
        /// Reset time of the last rate
        last_reset: f64,
    },

    /// An alive-rate frontier entry is out of range or decreasing.
    #[error("Invalid first alive rate {value} at step {step} for {number_of_rates} rates")]
    InvalidFrontier {
        /// Step index
        step: usize,
        /// Frontier value at that step
        value: usize,
        /// Number of rates in the model
        number_of_rates: usize,
    },

    /// A stored field disagrees with the value derived from the times.
    #[error("Inconsistent evolution: stored {field} does not match the rate and evolution times")]
    InconsistentSchedule {
        /// Name of the disagreeing field
        field: &'static str,
    },
}

/// Errors from building a pseudo-root market model.
///
/// # Examples
///
/// ```
/// use pricer_core::market_model::MarketModelError;
///
/// let err = MarketModelError::DimensionMismatch {
///     what: "initial rates",
///     expected: 3,
///     actual: 2,
/// };
/// assert_eq!(format!("{}", err), "Dimension mismatch for initial rates: expected 3, got 2");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketModelError {
    /// A vector or matrix does not have the size implied by the evolution.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Name of the mismatched input
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// The model must have at least one factor.
    #[error("Number of factors must be positive")]
    NoFactors,

    /// A parameter is NaN or infinite.
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    /// A parameter is outside its admissible domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The evolution itself could not be built.
    #[error("Evolution error: {0}")]
    Evolution(#[from] EvolutionError),
}
