//! Vega bump error types.

use pricer_core::market_model::MarketModelError;
use thiserror::Error;

use super::cluster::{BumpAxis, VegaBumpCluster};

/// Errors from building or verifying vega bump partitions.
///
/// Queries (`does_intersect`, `is_compatible`, `is_full`,
/// `is_non_overlapping`, `is_sensible`) never fail; only construction,
/// verification and model bumping return these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VegaBumpError {
    /// A cluster range has `begin >= end`.
    #[error("Invalid {axis} range in vega bump cluster: begin {begin} must be less than end {end}")]
    InvalidRange {
        /// Axis of the offending range.
        axis: BumpAxis,
        /// Range start.
        begin: usize,
        /// Range end (exclusive).
        end: usize,
    },

    /// A supplied cluster does not fit the market model.
    #[error("Incompatible vega bump at index {index}: {cluster} does not fit the market model")]
    IncompatibleBump {
        /// Position of the cluster in the supplied list.
        index: usize,
        /// The offending cluster.
        cluster: VegaBumpCluster,
    },

    /// The collection leaves alive cells uncovered or covers cells twice.
    #[error("Vega bump collection is not sensible: {uncovered} uncovered cells, {excess_markings} excess markings")]
    NotSensible {
        /// Alive cells covered by no cluster.
        uncovered: usize,
        /// Markings beyond the first, summed over all cells.
        excess_markings: usize,
    },

    /// Applying a bump to a model failed.
    #[error("Model bump failed: {0}")]
    Model(#[from] MarketModelError),
}
