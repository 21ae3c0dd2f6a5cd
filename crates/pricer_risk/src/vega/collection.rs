//! Vega bump collections: partitions of a model's alive pseudo-root cells.
//!
//! A collection moves through two states:
//!
//! ```text
//! UnverifiedBumpCollection --verify()--> VerifiedBumpCollection
//! ```
//!
//! Caller-supplied partitions start unverified: each cluster is checked for
//! compatibility with the model, and coverage is computed on first query.
//! Generated partitions are verified by construction. Downstream vega code
//! accepts only [`VerifiedBumpCollection`].

use std::sync::{Arc, OnceLock};

use pricer_core::market_model::MarketModel;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::cluster::VegaBumpCluster;
use super::coverage::CoverageReport;
use super::error::VegaBumpError;

/// Collections with at least this many clusters search overlapping pairs in
/// parallel.
pub const PARALLEL_PAIR_THRESHOLD: usize = 256;

/// Caller-supplied vega bump partition whose coverage is not yet known.
///
/// Every cluster is compatible with the model. The coverage report is
/// computed on the first coverage query and reused afterwards; the
/// collection has no mutating methods, so the cached report cannot go stale.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use pricer_core::market_model::EvolutionDescription;
/// use pricer_models::models::market::{PseudoRootMatrix, PseudoRootModel};
/// use pricer_risk::vega::{UnverifiedBumpCollection, VegaBumpCluster};
///
/// let evolution = EvolutionDescription::from_first_alive_rate(2, vec![0, 1]).unwrap();
/// let model = Arc::new(
///     PseudoRootModel::new(
///         vec![0.03; 2],
///         vec![0.0; 2],
///         evolution,
///         vec![PseudoRootMatrix::zeros(2, 1), PseudoRootMatrix::zeros(2, 1)],
///     )
///     .unwrap(),
/// );
///
/// let bumps = vec![
///     VegaBumpCluster::new(0, 1, 0, 2, 0, 1).unwrap(),
///     VegaBumpCluster::unit(0, 1, 1).unwrap(),
/// ];
/// let collection = UnverifiedBumpCollection::new(bumps, model).unwrap();
/// assert!(collection.is_sensible());
///
/// let verified = collection.verify().unwrap();
/// assert_eq!(verified.number_bumps(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct UnverifiedBumpCollection<M: MarketModel> {
    bumps: Vec<VegaBumpCluster>,
    model: Arc<M>,
    coverage: OnceLock<CoverageReport>,
}

impl<M: MarketModel> UnverifiedBumpCollection<M> {
    /// Accept a caller-supplied partition for `model`.
    ///
    /// # Errors
    ///
    /// Returns [`VegaBumpError::IncompatibleBump`] naming the first cluster
    /// that does not fit the model.
    pub fn new(bumps: Vec<VegaBumpCluster>, model: Arc<M>) -> Result<Self, VegaBumpError> {
        if let Some((index, cluster)) = bumps
            .iter()
            .enumerate()
            .find(|(_, cluster)| !cluster.is_compatible(model.as_ref()))
        {
            warn!(index, %cluster, "incompatible vega bump rejected");
            return Err(VegaBumpError::IncompatibleBump {
                index,
                cluster: *cluster,
            });
        }

        Ok(Self {
            bumps,
            model,
            coverage: OnceLock::new(),
        })
    }

    /// Clusters in caller order.
    #[inline]
    pub fn all_bumps(&self) -> &[VegaBumpCluster] {
        &self.bumps
    }

    /// Number of clusters.
    #[inline]
    pub fn number_bumps(&self) -> usize {
        self.bumps.len()
    }

    /// Associated market model.
    #[inline]
    pub fn model(&self) -> &Arc<M> {
        &self.model
    }

    /// Coverage report, computed on first call.
    pub fn coverage(&self) -> &CoverageReport {
        self.coverage
            .get_or_init(|| CoverageReport::compute(&self.bumps, self.model.as_ref()))
    }

    /// Returns true if every alive cell is bumped at least once.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.coverage().is_full()
    }

    /// Returns true if no cell is bumped more than once.
    #[inline]
    pub fn is_non_overlapping(&self) -> bool {
        self.coverage().is_non_overlapping()
    }

    /// Returns true if every alive cell is bumped exactly once.
    #[inline]
    pub fn is_sensible(&self) -> bool {
        self.is_full() && self.is_non_overlapping()
    }

    /// Index pairs `(i, j)`, `i < j`, of intersecting clusters, sorted.
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let bumps = &self.bumps;
        let partners = move |i: usize| {
            bumps[i + 1..]
                .iter()
                .enumerate()
                .filter(move |(_, other)| bumps[i].does_intersect(other))
                .map(move |(k, _)| (i, i + 1 + k))
        };

        let mut pairs: Vec<(usize, usize)> = if bumps.len() >= PARALLEL_PAIR_THRESHOLD {
            (0..bumps.len())
                .into_par_iter()
                .flat_map_iter(partners)
                .collect()
        } else {
            (0..bumps.len()).flat_map(partners).collect()
        };
        pairs.sort_unstable();
        pairs
    }

    /// Promote the collection to a verified one.
    ///
    /// # Errors
    ///
    /// Returns [`VegaBumpError::NotSensible`] if some alive cell is not
    /// bumped exactly once.
    pub fn verify(self) -> Result<VerifiedBumpCollection<M>, VegaBumpError> {
        let report = self.coverage();
        if !report.is_sensible() {
            return Err(VegaBumpError::NotSensible {
                uncovered: report.uncovered().len(),
                excess_markings: report.excess_markings(),
            });
        }

        debug!(bumps = self.bumps.len(), "vega bump collection verified");
        Ok(VerifiedBumpCollection {
            bumps: self.bumps,
            model: self.model,
        })
    }
}

/// Vega bump partition known to bump every alive cell exactly once.
///
/// Obtained from [`VerifiedBumpCollection::generate`] or
/// [`UnverifiedBumpCollection::verify`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use pricer_core::market_model::{EvolutionDescription, MarketModelFactory};
/// use pricer_models::models::market::FlatVolFactory;
/// use pricer_risk::vega::VerifiedBumpCollection;
///
/// let evolution = EvolutionDescription::new(vec![0.5, 1.0, 1.5, 2.0], vec![0.5, 1.0]).unwrap();
/// let model = FlatVolFactory::new(0.03, 0.0, 0.2).unwrap().create(&evolution, 2).unwrap();
///
/// let per_rate = VerifiedBumpCollection::generate(Arc::new(model.clone()), false);
/// assert_eq!(per_rate.number_bumps(), 5);
///
/// let per_factor = VerifiedBumpCollection::generate(Arc::new(model), true);
/// assert_eq!(per_factor.number_bumps(), 10);
/// assert!(per_factor.is_sensible());
/// ```
#[derive(Debug, Clone)]
pub struct VerifiedBumpCollection<M: MarketModel> {
    bumps: Vec<VegaBumpCluster>,
    model: Arc<M>,
}

impl<M: MarketModel> VerifiedBumpCollection<M> {
    /// Generate the canonical partition of `model`'s alive cells.
    ///
    /// Steps outermost, then alive rates. With `factorwise_bumping` each
    /// (factor, rate, step) cell is its own cluster; otherwise one cluster
    /// per (rate, step) spans all factors.
    pub fn generate(model: Arc<M>, factorwise_bumping: bool) -> Self {
        let factors = model.number_of_factors();
        let rates = model.number_of_rates();

        let mut bumps = Vec::new();
        for (step, &first_alive) in model.evolution().first_alive_rate().iter().enumerate() {
            for rate in first_alive..rates {
                if factorwise_bumping {
                    bumps.extend(
                        (0..factors).filter_map(|factor| VegaBumpCluster::unit(factor, rate, step).ok()),
                    );
                } else {
                    bumps.extend(VegaBumpCluster::all_factors(factors, rate, step).ok());
                }
            }
        }

        debug!(
            bumps = bumps.len(),
            factorwise_bumping,
            "generated vega bump collection"
        );

        Self { bumps, model }
    }

    /// Clusters in generation or caller order.
    #[inline]
    pub fn all_bumps(&self) -> &[VegaBumpCluster] {
        &self.bumps
    }

    /// Number of clusters.
    #[inline]
    pub fn number_bumps(&self) -> usize {
        self.bumps.len()
    }

    /// Associated market model.
    #[inline]
    pub fn model(&self) -> &Arc<M> {
        &self.model
    }

    /// Always true: verified collections are full.
    #[inline]
    pub fn is_full(&self) -> bool {
        true
    }

    /// Always true: verified collections do not overlap.
    #[inline]
    pub fn is_non_overlapping(&self) -> bool {
        true
    }

    /// Always true: verified collections bump every alive cell exactly once.
    #[inline]
    pub fn is_sensible(&self) -> bool {
        true
    }

    /// Give up verification, e.g. to inspect the coverage report again.
    pub fn into_unverified(self) -> UnverifiedBumpCollection<M> {
        UnverifiedBumpCollection {
            bumps: self.bumps,
            model: self.model,
            coverage: OnceLock::new(),
        }
    }

    /// Consume the collection, returning its clusters.
    pub fn into_bumps(self) -> Vec<VegaBumpCluster> {
        self.bumps
    }
}
