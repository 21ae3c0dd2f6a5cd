//! Coverage verification of vega bump partitions.
//!
//! Every cluster marks its cells on a flat `steps x rates x factors` grid.
//! The cell `(factor, rate, step)` lives at
//!
//! ```text
//! step * rates * factors + rate * factors + factor
//! ```
//!
//! A partition is full when every alive cell has at least one mark and
//! non-overlapping when no cell has more than one.

use pricer_core::market_model::MarketModel;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::cluster::VegaBumpCluster;

/// One cell of the pseudo-root grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GridCell {
    /// Factor index.
    pub factor: usize,
    /// Rate index.
    pub rate: usize,
    /// Step index.
    pub step: usize,
}

impl GridCell {
    /// Create a cell.
    #[inline]
    pub fn new(factor: usize, rate: usize, step: usize) -> Self {
        Self { factor, rate, step }
    }
}

/// Outcome of marking a set of clusters on a model's grid.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use pricer_core::market_model::EvolutionDescription;
/// use pricer_models::models::market::{PseudoRootMatrix, PseudoRootModel};
/// use pricer_risk::vega::{UnverifiedBumpCollection, VegaBumpCluster};
///
/// let evolution = EvolutionDescription::from_first_alive_rate(2, vec![0]).unwrap();
/// let model = PseudoRootModel::new(
///     vec![0.03, 0.03],
///     vec![0.0, 0.0],
///     evolution,
///     vec![PseudoRootMatrix::zeros(2, 1)],
/// )
/// .unwrap();
///
/// // Only rate 0 is bumped: rate 1 is a gap
/// let bumps = vec![VegaBumpCluster::unit(0, 0, 0).unwrap()];
/// let collection = UnverifiedBumpCollection::new(bumps, Arc::new(model)).unwrap();
///
/// let report = collection.coverage();
/// assert!(!report.is_full());
/// assert!(report.is_non_overlapping());
/// assert_eq!(report.uncovered().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CoverageReport {
    uncovered: Vec<GridCell>,
    overlapped: Vec<GridCell>,
    excess_markings: usize,
}

impl CoverageReport {
    /// Mark `clusters` on the grid of `model` and classify the result.
    ///
    /// Clusters must be compatible with `model`; both collection
    /// constructors guarantee this.
    pub(crate) fn compute<M: MarketModel + ?Sized>(
        clusters: &[VegaBumpCluster],
        model: &M,
    ) -> Self {
        let mut grid = CoverageGrid::new(
            model.number_of_factors(),
            model.number_of_rates(),
            model.number_of_steps(),
        );
        for cluster in clusters {
            grid.mark(cluster);
        }

        let mut uncovered = Vec::new();
        for (step, &first_alive) in model.evolution().first_alive_rate().iter().enumerate() {
            for rate in first_alive..grid.rates {
                for factor in 0..grid.factors {
                    if grid.marks(factor, rate, step) == 0 {
                        uncovered.push(GridCell::new(factor, rate, step));
                    }
                }
            }
        }

        let mut overlapped = Vec::new();
        let mut excess_markings = 0;
        for (idx, &count) in grid.marks.iter().enumerate() {
            if count > 1 {
                overlapped.push(grid.cell(idx));
                excess_markings += (count - 1) as usize;
            }
        }

        debug!(
            clusters = clusters.len(),
            uncovered = uncovered.len(),
            overlapped = overlapped.len(),
            excess_markings,
            "vega bump coverage computed"
        );

        Self {
            uncovered,
            overlapped,
            excess_markings,
        }
    }

    /// Returns true if every alive cell is bumped at least once.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.uncovered.is_empty()
    }

    /// Returns true if no cell is bumped more than once.
    #[inline]
    pub fn is_non_overlapping(&self) -> bool {
        self.excess_markings == 0
    }

    /// Returns true if every alive cell is bumped exactly once.
    #[inline]
    pub fn is_sensible(&self) -> bool {
        self.is_full() && self.is_non_overlapping()
    }

    /// Alive cells no cluster covers, in (step, rate, factor) order.
    #[inline]
    pub fn uncovered(&self) -> &[GridCell] {
        &self.uncovered
    }

    /// Cells covered more than once, in (step, rate, factor) order.
    #[inline]
    pub fn overlapped(&self) -> &[GridCell] {
        &self.overlapped
    }

    /// Markings beyond the first, summed over all cells.
    #[inline]
    pub fn excess_markings(&self) -> usize {
        self.excess_markings
    }
}

/// Mark counts on a flat `steps x rates x factors` grid.
struct CoverageGrid {
    factors: usize,
    rates: usize,
    marks: Vec<u32>,
}

impl CoverageGrid {
    fn new(factors: usize, rates: usize, steps: usize) -> Self {
        Self {
            factors,
            rates,
            marks: vec![0; steps * rates * factors],
        }
    }

    #[inline]
    fn index(&self, factor: usize, rate: usize, step: usize) -> usize {
        step * self.rates * self.factors + rate * self.factors + factor
    }

    #[inline]
    fn cell(&self, idx: usize) -> GridCell {
        let per_step = self.rates * self.factors;
        let step = idx / per_step;
        let rem = idx % per_step;
        GridCell::new(rem % self.factors, rem / self.factors, step)
    }

    #[inline]
    fn marks(&self, factor: usize, rate: usize, step: usize) -> u32 {
        self.marks[self.index(factor, rate, step)]
    }

    fn mark(&mut self, cluster: &VegaBumpCluster) {
        for step in cluster.steps() {
            for rate in cluster.rates() {
                let row = self.index(cluster.factor_begin(), rate, step);
                for count in &mut self.marks[row..row + cluster.factors().len()] {
                    *count += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::market_model::EvolutionDescription;

    struct Grid {
        factors: usize,
        evolution: EvolutionDescription,
    }

    impl MarketModel for Grid {
        fn number_of_factors(&self) -> usize {
            self.factors
        }

        fn evolution(&self) -> &EvolutionDescription {
            &self.evolution
        }
    }

    fn grid(factors: usize, rates: usize, frontier: Vec<usize>) -> Grid {
        Grid {
            factors,
            evolution: EvolutionDescription::from_first_alive_rate(rates, frontier).unwrap(),
        }
    }

    #[test]
    fn test_grid_index_round_trip() {
        let g = CoverageGrid::new(3, 4, 2);
        for step in 0..2 {
            for rate in 0..4 {
                for factor in 0..3 {
                    let idx = g.index(factor, rate, step);
                    assert_eq!(g.cell(idx), GridCell::new(factor, rate, step));
                }
            }
        }
        assert_eq!(g.index(2, 3, 1), g.marks.len() - 1);
    }

    #[test]
    fn test_exact_partition_is_sensible() {
        let model = grid(2, 3, vec![0, 1]);
        let clusters = vec![
            VegaBumpCluster::new(0, 2, 0, 3, 0, 1).unwrap(),
            VegaBumpCluster::new(0, 2, 1, 3, 1, 2).unwrap(),
        ];
        let report = CoverageReport::compute(&clusters, &model);
        assert!(report.is_full());
        assert!(report.is_non_overlapping());
        assert!(report.is_sensible());
        assert!(report.uncovered().is_empty());
        assert!(report.overlapped().is_empty());
    }

    #[test]
    fn test_dead_cells_need_no_cover() {
        // Rate 0 at step 1 has reset: leaving it unmarked is still full
        let model = grid(1, 2, vec![0, 1]);
        let clusters = vec![
            VegaBumpCluster::new(0, 1, 0, 2, 0, 1).unwrap(),
            VegaBumpCluster::unit(0, 1, 1).unwrap(),
        ];
        assert!(CoverageReport::compute(&clusters, &model).is_full());
    }

    #[test]
    fn test_gap_reported() {
        let model = grid(2, 2, vec![0]);
        let clusters = vec![VegaBumpCluster::new(0, 2, 0, 1, 0, 1).unwrap(), VegaBumpCluster::unit(0, 1, 0).unwrap()];
        let report = CoverageReport::compute(&clusters, &model);
        assert!(!report.is_full());
        assert!(report.is_non_overlapping());
        assert_eq!(report.uncovered(), &[GridCell::new(1, 1, 0)]);
    }

    #[test]
    fn test_overlap_reported() {
        let model = grid(1, 2, vec![0]);
        let clusters = vec![
            VegaBumpCluster::new(0, 1, 0, 2, 0, 1).unwrap(),
            VegaBumpCluster::unit(0, 1, 0).unwrap(),
            VegaBumpCluster::unit(0, 1, 0).unwrap(),
        ];
        let report = CoverageReport::compute(&clusters, &model);
        assert!(report.is_full());
        assert!(!report.is_non_overlapping());
        assert!(!report.is_sensible());
        assert_eq!(report.overlapped(), &[GridCell::new(0, 1, 0)]);
        assert_eq!(report.excess_markings(), 2);
    }

    #[test]
    fn test_empty_collection() {
        let model = grid(2, 2, vec![1]);
        let report = CoverageReport::compute(&[], &model);
        assert!(!report.is_full());
        assert!(report.is_non_overlapping());
        assert_eq!(report.uncovered().len(), 2);
    }

    #[test]
    fn test_default_report_is_sensible() {
        assert!(CoverageReport::default().is_sensible());
    }
}
