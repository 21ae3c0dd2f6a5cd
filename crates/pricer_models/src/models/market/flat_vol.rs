//! Flat-volatility pseudo-root factory.

use pricer_core::market_model::{EvolutionDescription, MarketModelError, MarketModelFactory};
use pricer_core::traits::Float;

use super::pseudo_root::{PseudoRootMatrix, PseudoRootModel};

/// Builds [`PseudoRootModel`] snapshots with one flat volatility for every
/// alive rate.
///
/// Over step `j` of length `dt_j`, each alive rate gets the loading
/// `vol * sqrt(dt_j / factors)` on every factor, so its variance over the
/// step is `vol^2 * dt_j`. Rates that have reset carry zero rows.
///
/// # Example
///
/// ```
/// use pricer_core::market_model::{EvolutionDescription, MarketModel, MarketModelFactory};
/// use pricer_models::models::market::FlatVolFactory;
///
/// let evolution = EvolutionDescription::new(vec![0.5, 1.0, 1.5], vec![0.5, 1.0]).unwrap();
/// let factory = FlatVolFactory::new(0.03_f64, 0.0, 0.20).unwrap();
///
/// let model = factory.create(&evolution, 2).unwrap();
/// assert_eq!(model.number_of_factors(), 2);
///
/// let var = model.covariance(0).unwrap()[0][0];
/// assert!((var - 0.04 * 0.5).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FlatVolFactory<T: Float> {
    initial_rate: T,
    displacement: T,
    volatility: T,
}

impl<T: Float> FlatVolFactory<T> {
    /// Create a factory.
    ///
    /// # Errors
    ///
    /// `NonFinite` for NaN/infinite inputs, `InvalidParameter` for a negative
    /// volatility.
    pub fn new(initial_rate: T, displacement: T, volatility: T) -> Result<Self, MarketModelError> {
        if !initial_rate.is_finite() || !displacement.is_finite() || !volatility.is_finite() {
            return Err(MarketModelError::NonFinite("flat-vol parameters"));
        }
        if volatility < T::zero() {
            return Err(MarketModelError::InvalidParameter(
                "volatility must be non-negative".to_string(),
            ));
        }
        Ok(Self {
            initial_rate,
            displacement,
            volatility,
        })
    }

    /// Flat volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }
}

impl<T: Float> MarketModelFactory for FlatVolFactory<T> {
    type Model = PseudoRootModel<T>;

    fn create(
        &self,
        evolution: &EvolutionDescription,
        number_of_factors: usize,
    ) -> Result<PseudoRootModel<T>, MarketModelError> {
        if number_of_factors == 0 {
            return Err(MarketModelError::NoFactors);
        }

        let n_rates = evolution.number_of_rates();
        let factors = T::from(number_of_factors).ok_or(MarketModelError::NonFinite("factors"))?;

        let mut pseudo_roots = Vec::with_capacity(evolution.number_of_steps());
        for (step, &first_alive) in evolution.first_alive_rate().iter().enumerate() {
            let dt = evolution.step_length(step).ok_or_else(|| {
                MarketModelError::InvalidParameter(
                    "flat-vol factory needs an evolution with times".to_string(),
                )
            })?;
            let dt = T::from(dt).ok_or(MarketModelError::NonFinite("step length"))?;
            let loading = self.volatility * (dt / factors).sqrt();

            let mut data = vec![T::zero(); n_rates * number_of_factors];
            for r in first_alive..n_rates {
                for f in 0..number_of_factors {
                    data[r * number_of_factors + f] = loading;
                }
            }
            pseudo_roots.push(PseudoRootMatrix::new(n_rates, number_of_factors, data)?);
        }

        PseudoRootModel::new(
            vec![self.initial_rate; n_rates],
            vec![self.displacement; n_rates],
            evolution.clone(),
            pseudo_roots,
        )
    }
}
