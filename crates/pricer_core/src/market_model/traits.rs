//! Market model capability traits.

use super::evolution::EvolutionDescription;
use super::error::MarketModelError;

/// Read-only view of a multi-factor market model's volatility grid.
///
/// This is the only capability risk code needs from a model: the grid
/// dimensions and the alive-rate frontier. Concrete models (pseudo-root
/// models, adapters re-expressing one rate family as another) implement it
/// directly; consumers stay generic over `M: MarketModel`.
///
/// # Contract
///
/// - `evolution().first_alive_rate().len() == number_of_steps()`
/// - `evolution().number_of_rates() == number_of_rates()`
/// - `number_of_factors() >= 1`
///
/// # Example
///
/// ```
/// use pricer_core::market_model::{EvolutionDescription, MarketModel};
///
/// struct Grid {
///     evolution: EvolutionDescription,
/// }
///
/// impl MarketModel for Grid {
///     fn number_of_factors(&self) -> usize {
///         2
///     }
///     fn evolution(&self) -> &EvolutionDescription {
///         &self.evolution
///     }
/// }
///
/// let grid = Grid {
///     evolution: EvolutionDescription::from_first_alive_rate(3, vec![0, 1]).unwrap(),
/// };
/// assert_eq!(grid.number_of_rates(), 3);
/// assert_eq!(grid.number_of_steps(), 2);
/// assert_eq!(grid.first_alive_rate(1), Some(1));
/// ```
pub trait MarketModel {
    /// Number of independent Brownian factors.
    fn number_of_factors(&self) -> usize;

    /// Evolution schedule, including the alive-rate frontier.
    fn evolution(&self) -> &EvolutionDescription;

    /// Number of forward rates.
    fn number_of_rates(&self) -> usize {
        self.evolution().number_of_rates()
    }

    /// Number of simulation steps.
    fn number_of_steps(&self) -> usize {
        self.evolution().number_of_steps()
    }

    /// First alive rate at `step`, or `None` past the last step.
    fn first_alive_rate(&self, step: usize) -> Option<usize> {
        self.evolution().first_alive_rate().get(step).copied()
    }
}

impl<M: MarketModel + ?Sized> MarketModel for &M {
    fn number_of_factors(&self) -> usize {
        (**self).number_of_factors()
    }

    fn evolution(&self) -> &EvolutionDescription {
        (**self).evolution()
    }

    fn number_of_rates(&self) -> usize {
        (**self).number_of_rates()
    }

    fn number_of_steps(&self) -> usize {
        (**self).number_of_steps()
    }

    fn first_alive_rate(&self, step: usize) -> Option<usize> {
        (**self).first_alive_rate(step)
    }
}

/// Pull-based producer of market model snapshots.
///
/// Callers that need a model for a new evolution or factor count ask the
/// factory for a fresh snapshot. Nothing is pushed to previously created
/// models; they remain valid and unchanged.
pub trait MarketModelFactory {
    /// Model type produced by this factory.
    type Model: MarketModel;

    /// Build a model snapshot on `evolution` with `number_of_factors` factors.
    ///
    /// # Errors
    ///
    /// Returns a [`MarketModelError`] if the factory parameters are not
    /// admissible for the requested grid.
    fn create(
        &self,
        evolution: &EvolutionDescription,
        number_of_factors: usize,
    ) -> Result<Self::Model, MarketModelError>;
}
