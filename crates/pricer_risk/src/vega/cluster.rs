//! Vega bump clusters: axis-aligned boxes on the (factor, rate, step) grid.

use std::fmt;
use std::ops::Range;

use pricer_core::market_model::MarketModel;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::coverage::GridCell;
use super::error::VegaBumpError;

/// Axis of the pseudo-root grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum BumpAxis {
    /// Brownian factor index (pseudo-root column).
    Factor,
    /// Forward rate index (pseudo-root row).
    Rate,
    /// Evolution step index (which pseudo-root).
    Step,
}

impl BumpAxis {
    /// Lower-case axis name.
    pub fn name(&self) -> &'static str {
        match self {
            BumpAxis::Factor => "factor",
            BumpAxis::Rate => "rate",
            BumpAxis::Step => "step",
        }
    }
}

impl fmt::Display for BumpAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One region of the pseudo-root grid receiving a single vega bump.
///
/// The region is the product of three half-open ranges
/// `[factor_begin, factor_end) x [rate_begin, rate_end) x [step_begin, step_end)`,
/// each non-empty. Clusters are immutable values.
///
/// # Examples
///
/// ```rust
/// use pricer_risk::vega::VegaBumpCluster;
///
/// let a = VegaBumpCluster::new(0, 2, 0, 1, 0, 1).unwrap();
/// let b = VegaBumpCluster::new(1, 2, 0, 3, 0, 2).unwrap();
/// assert!(a.does_intersect(&b));
/// assert_eq!(a.volume(), 2);
///
/// // Empty ranges are rejected
/// assert!(VegaBumpCluster::new(0, 1, 2, 2, 0, 1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VegaBumpCluster {
    factor_begin: usize,
    factor_end: usize,
    rate_begin: usize,
    rate_end: usize,
    step_begin: usize,
    step_end: usize,
}

impl VegaBumpCluster {
    /// Create a cluster from three half-open ranges.
    ///
    /// # Errors
    ///
    /// Returns [`VegaBumpError::InvalidRange`] for the first axis (factor,
    /// rate, step) whose begin is not strictly less than its end.
    pub fn new(
        factor_begin: usize,
        factor_end: usize,
        rate_begin: usize,
        rate_end: usize,
        step_begin: usize,
        step_end: usize,
    ) -> Result<Self, VegaBumpError> {
        check_axis(BumpAxis::Factor, factor_begin, factor_end)?;
        check_axis(BumpAxis::Rate, rate_begin, rate_end)?;
        check_axis(BumpAxis::Step, step_begin, step_end)?;

        Ok(Self {
            factor_begin,
            factor_end,
            rate_begin,
            rate_end,
            step_begin,
            step_end,
        })
    }

    /// Create a cluster from `Range`s.
    ///
    /// # Errors
    ///
    /// Same as [`VegaBumpCluster::new`].
    pub fn from_ranges(
        factors: Range<usize>,
        rates: Range<usize>,
        steps: Range<usize>,
    ) -> Result<Self, VegaBumpError> {
        Self::new(
            factors.start,
            factors.end,
            rates.start,
            rates.end,
            steps.start,
            steps.end,
        )
    }

    /// Cluster covering a single cell.
    ///
    /// # Errors
    ///
    /// Returns [`VegaBumpError::InvalidRange`] when an index is `usize::MAX`,
    /// which leaves no room for a non-empty range.
    pub fn unit(factor: usize, rate: usize, step: usize) -> Result<Self, VegaBumpError> {
        Self::new(
            factor,
            factor.saturating_add(1),
            rate,
            rate.saturating_add(1),
            step,
            step.saturating_add(1),
        )
    }

    /// Cluster covering every factor of one (rate, step) cell.
    ///
    /// # Errors
    ///
    /// Returns [`VegaBumpError::InvalidRange`] when `number_of_factors` is
    /// zero or an index is `usize::MAX`.
    pub fn all_factors(
        number_of_factors: usize,
        rate: usize,
        step: usize,
    ) -> Result<Self, VegaBumpError> {
        Self::new(
            0,
            number_of_factors,
            rate,
            rate.saturating_add(1),
            step,
            step.saturating_add(1),
        )
    }

    /// First factor.
    #[inline]
    pub fn factor_begin(&self) -> usize {
        self.factor_begin
    }

    /// One past the last factor.
    #[inline]
    pub fn factor_end(&self) -> usize {
        self.factor_end
    }

    /// First rate.
    #[inline]
    pub fn rate_begin(&self) -> usize {
        self.rate_begin
    }

    /// One past the last rate.
    #[inline]
    pub fn rate_end(&self) -> usize {
        self.rate_end
    }

    /// First step.
    #[inline]
    pub fn step_begin(&self) -> usize {
        self.step_begin
    }

    /// One past the last step.
    #[inline]
    pub fn step_end(&self) -> usize {
        self.step_end
    }

    /// Factor range.
    #[inline]
    pub fn factors(&self) -> Range<usize> {
        self.factor_begin..self.factor_end
    }

    /// Rate range.
    #[inline]
    pub fn rates(&self) -> Range<usize> {
        self.rate_begin..self.rate_end
    }

    /// Step range.
    #[inline]
    pub fn steps(&self) -> Range<usize> {
        self.step_begin..self.step_end
    }

    /// Number of grid cells covered.
    #[inline]
    pub fn volume(&self) -> usize {
        self.factors().len() * self.rates().len() * self.steps().len()
    }

    /// Returns true if the cell `(factor, rate, step)` lies in the cluster.
    #[inline]
    pub fn contains(&self, factor: usize, rate: usize, step: usize) -> bool {
        self.factors().contains(&factor)
            && self.rates().contains(&rate)
            && self.steps().contains(&step)
    }

    /// Returns true if the two clusters share at least one cell.
    ///
    /// Two boxes meet only if their ranges overlap on all three axes.
    /// The relation is symmetric and reflexive.
    pub fn does_intersect(&self, other: &VegaBumpCluster) -> bool {
        ranges_overlap(self.factors(), other.factors())
            && ranges_overlap(self.rates(), other.rates())
            && ranges_overlap(self.steps(), other.steps())
    }

    /// Returns true if the cluster can be applied to `model`.
    ///
    /// The cluster must lie inside the model's grid, and its first rate must
    /// still be alive at the last step it touches. Never fails: an unfit
    /// cluster simply yields `false`.
    pub fn is_compatible<M: MarketModel + ?Sized>(&self, model: &M) -> bool {
        if self.rate_end > model.number_of_rates()
            || self.step_end > model.number_of_steps()
            || self.factor_end > model.number_of_factors()
        {
            return false;
        }

        match model.first_alive_rate(self.step_end - 1) {
            Some(first_alive) => self.rate_begin >= first_alive,
            None => false,
        }
    }

    /// Iterate over the covered cells in (step, rate, factor) order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.steps().flat_map(move |step| {
            self.rates().flat_map(move |rate| {
                self.factors()
                    .map(move |factor| GridCell::new(factor, rate, step))
            })
        })
    }
}

impl fmt::Display for VegaBumpCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{})x[{},{})x[{},{})",
            self.factor_begin,
            self.factor_end,
            self.rate_begin,
            self.rate_end,
            self.step_begin,
            self.step_end
        )
    }
}

#[inline]
fn check_axis(axis: BumpAxis, begin: usize, end: usize) -> Result<(), VegaBumpError> {
    if begin < end {
        Ok(())
    } else {
        Err(VegaBumpError::InvalidRange { axis, begin, end })
    }
}

#[inline]
fn ranges_overlap(a: Range<usize>, b: Range<usize>) -> bool {
    a.end > b.start && b.end > a.start
}
