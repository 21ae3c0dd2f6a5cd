//! Applying verified vega bumps to pseudo-root models.

use pricer_core::traits::Float;
use pricer_models::models::market::PseudoRootModel;
use rayon::prelude::*;

use super::cluster::VegaBumpCluster;
use super::collection::VerifiedBumpCollection;
use super::error::VegaBumpError;

/// Return a copy of `model` with `amount` added to the pseudo-root entries
/// inside `cluster`.
///
/// # Errors
///
/// Returns [`VegaBumpError::Model`] if the cluster exceeds the model's grid
/// or `amount` is not finite.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_model::{EvolutionDescription, MarketModelFactory};
/// use pricer_models::models::market::FlatVolFactory;
/// use pricer_risk::vega::{bump_pseudo_roots, VegaBumpCluster};
///
/// let evolution = EvolutionDescription::new(vec![0.5, 1.0, 1.5], vec![0.5]).unwrap();
/// let model = FlatVolFactory::new(0.03, 0.0, 0.2).unwrap().create(&evolution, 1).unwrap();
///
/// let bumped = bump_pseudo_roots(&model, &VegaBumpCluster::unit(0, 1, 0).unwrap(), 0.01).unwrap();
/// let before: f64 = model.pseudo_root(0).unwrap().get(1, 0).unwrap();
/// let after = bumped.pseudo_root(0).unwrap().get(1, 0).unwrap();
/// assert!((after - before - 0.01).abs() < 1e-12);
/// ```
pub fn bump_pseudo_roots<T: Float>(
    model: &PseudoRootModel<T>,
    cluster: &VegaBumpCluster,
    amount: T,
) -> Result<PseudoRootModel<T>, VegaBumpError> {
    Ok(model.with_bumped_pseudo_roots(cluster.factors(), cluster.rates(), cluster.steps(), amount)?)
}

impl<T: Float + Send + Sync> VerifiedBumpCollection<PseudoRootModel<T>> {
    /// One bumped model per cluster, in cluster order.
    ///
    /// These are the perturbed snapshots a finite-difference vega
    /// computation revalues against the base model.
    ///
    /// # Errors
    ///
    /// Returns [`VegaBumpError::Model`] if `amount` is not finite.
    pub fn bumped_models(&self, amount: T) -> Result<Vec<PseudoRootModel<T>>, VegaBumpError> {
        let model = self.model().as_ref();
        self.all_bumps()
            .par_iter()
            .map(|cluster| bump_pseudo_roots(model, cluster, amount))
            .collect()
    }
}
