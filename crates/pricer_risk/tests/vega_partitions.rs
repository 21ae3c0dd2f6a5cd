//! Integration tests for vega bump partitions.
//!
//! These tests drive the public API end to end: models from the flat-vol
//! factory, generated and supplied partitions, verification and bumping.

use std::sync::Arc;

use proptest::prelude::*;
use pricer_core::market_model::{EvolutionDescription, MarketModel, MarketModelFactory};
use pricer_models::models::market::{FlatVolFactory, PseudoRootMatrix, PseudoRootModel};
use pricer_risk::vega::{
    UnverifiedBumpCollection, VegaBumpCluster, VegaBumpError, VerifiedBumpCollection,
};

/// Zero-vol model on a frontier-only evolution.
fn frontier_model(factors: usize, rates: usize, frontier: Vec<usize>) -> Arc<PseudoRootModel<f64>> {
    let steps = frontier.len();
    let evolution = EvolutionDescription::from_first_alive_rate(rates, frontier).unwrap();
    Arc::new(
        PseudoRootModel::new(
            vec![0.03; rates],
            vec![0.0; rates],
            evolution,
            vec![PseudoRootMatrix::zeros(rates, factors); steps],
        )
        .unwrap(),
    )
}

fn expected_count(model: &PseudoRootModel<f64>, factorwise: bool) -> usize {
    let per_cell = if factorwise {
        model.number_of_factors()
    } else {
        1
    };
    model
        .evolution()
        .first_alive_rate()
        .iter()
        .map(|&first| (model.number_of_rates() - first) * per_cell)
        .sum()
}

// ============================================================================
// Concrete scenario
// ============================================================================

#[test]
fn test_two_step_three_rate_scenario() {
    let model = frontier_model(2, 3, vec![0, 1]);
    let collection = VerifiedBumpCollection::generate(model, false);

    let expected: Vec<VegaBumpCluster> = [
        (0, 2, 0, 1, 0, 1),
        (0, 2, 1, 2, 0, 1),
        (0, 2, 1, 2, 1, 2),
        (0, 2, 2, 3, 1, 2),
    ]
    .iter()
    .map(|&(f0, f1, r0, r1, s0, s1)| VegaBumpCluster::new(f0, f1, r0, r1, s0, s1).unwrap())
    .collect();

    assert_eq!(collection.number_bumps(), 4);
    assert_eq!(collection.all_bumps(), expected.as_slice());
    assert!(collection.is_sensible());
}

#[test]
fn test_time_based_evolution_matches_frontier() {
    let evolution = EvolutionDescription::new(vec![0.5, 1.0, 1.5, 2.0], vec![0.5, 1.0]).unwrap();
    let model = FlatVolFactory::new(0.03, 0.0, 0.2)
        .unwrap()
        .create(&evolution, 2)
        .unwrap();
    let from_times = VerifiedBumpCollection::generate(Arc::new(model), false);
    let from_frontier = VerifiedBumpCollection::generate(frontier_model(2, 3, vec![0, 1]), false);
    assert_eq!(from_times.all_bumps(), from_frontier.all_bumps());
}

// ============================================================================
// Gap and overlap detection
// ============================================================================

#[test]
fn test_duplicated_cell_fails_sensibility() {
    let model = frontier_model(2, 3, vec![0, 1]);
    let mut bumps = VerifiedBumpCollection::generate(model.clone(), true).into_bumps();
    bumps.push(VegaBumpCluster::unit(1, 2, 1).unwrap());

    let collection = UnverifiedBumpCollection::new(bumps, model).unwrap();
    assert!(collection.is_full());
    assert!(!collection.is_non_overlapping());
    assert!(!collection.is_sensible());
    assert!(matches!(
        collection.verify(),
        Err(VegaBumpError::NotSensible { uncovered: 0, excess_markings: 1 })
    ));
}

#[test]
fn test_every_single_removal_leaves_a_gap() {
    let model = frontier_model(2, 4, vec![0, 1, 3]);
    for factorwise in [false, true] {
        let full = VerifiedBumpCollection::generate(model.clone(), factorwise).into_bumps();
        for removed in 0..full.len() {
            let mut bumps = full.clone();
            bumps.remove(removed);
            let collection = UnverifiedBumpCollection::new(bumps, model.clone()).unwrap();
            assert!(!collection.is_full(), "removing bump {} kept coverage full", removed);
            assert!(!collection.is_sensible());
        }
    }
}

#[test]
fn test_dead_rate_bump_rejected_at_construction() {
    let model = frontier_model(1, 3, vec![0, 2]);
    let bumps = vec![VegaBumpCluster::new(0, 1, 1, 3, 0, 2).unwrap()];
    match UnverifiedBumpCollection::new(bumps, model) {
        Err(VegaBumpError::IncompatibleBump { index, cluster }) => {
            assert_eq!(index, 0);
            assert_eq!(cluster.rate_begin(), 1);
        }
        other => panic!("expected IncompatibleBump, got {:?}", other.map(|c| c.number_bumps())),
    }
}

#[test]
fn test_verified_collection_bumps_every_alive_cell_once() {
    let evolution =
        EvolutionDescription::new(vec![0.25, 0.5, 0.75, 1.0, 1.25], vec![0.25, 0.5, 0.75])
            .unwrap();
    let model = FlatVolFactory::new(0.03, 0.0, 0.15)
        .unwrap()
        .create(&evolution, 3)
        .unwrap();
    let collection = VerifiedBumpCollection::generate(Arc::new(model), true);
    let bumped = collection.bumped_models(1e-4).unwrap();

    let base = collection.model();
    let mut hits = vec![0usize; 3 * 4 * 3];
    for m in &bumped {
        for step in 0..3 {
            for rate in 0..4 {
                for factor in 0..3 {
                    let delta: f64 = m.pseudo_root(step).unwrap().get(rate, factor).unwrap()
                        - base.pseudo_root(step).unwrap().get(rate, factor).unwrap();
                    if delta.abs() > 1e-12 {
                        hits[step * 12 + rate * 3 + factor] += 1;
                    }
                }
            }
        }
    }

    for step in 0..3 {
        for rate in 0..4 {
            for factor in 0..3 {
                let expected = usize::from(base.evolution().is_alive(rate, step));
                assert_eq!(hits[step * 12 + rate * 3 + factor], expected);
            }
        }
    }
}

// ============================================================================
// Property tests
// ============================================================================

fn frontier_strategy() -> impl Strategy<Value = (usize, usize, Vec<usize>)> {
    (1usize..4, 1usize..7, 1usize..6).prop_flat_map(|(factors, rates, steps)| {
        proptest::collection::vec(0..rates, steps).prop_map(move |mut frontier| {
            frontier.sort_unstable();
            (factors, rates, frontier)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_generated_collections_are_sensible((factors, rates, frontier) in frontier_strategy()) {
        let model = frontier_model(factors, rates, frontier);
        for factorwise in [false, true] {
            let generated = VerifiedBumpCollection::generate(model.clone(), factorwise);
            prop_assert_eq!(generated.number_bumps(), expected_count(&model, factorwise));

            let rechecked = UnverifiedBumpCollection::new(generated.into_bumps(), model.clone()).unwrap();
            prop_assert!(rechecked.is_sensible());
            prop_assert!(rechecked.overlapping_pairs().is_empty());
        }
    }

    #[test]
    fn test_compatibility_boundaries(
        (factors, rates, frontier) in frontier_strategy(),
        extra in 1usize..3,
    ) {
        let model = frontier_model(factors, rates, frontier.clone());
        let steps = frontier.len();
        let last_alive = frontier[steps - 1];

        let whole = VegaBumpCluster::new(0, factors, last_alive, rates, 0, steps).unwrap();
        prop_assert!(whole.is_compatible(model.as_ref()));

        let too_many_rates = VegaBumpCluster::new(0, factors, last_alive, rates + extra, 0, steps).unwrap();
        let too_many_steps = VegaBumpCluster::new(0, factors, last_alive, rates, 0, steps + extra).unwrap();
        let too_many_factors = VegaBumpCluster::new(0, factors + extra, last_alive, rates, 0, steps).unwrap();
        prop_assert!(!too_many_rates.is_compatible(model.as_ref()));
        prop_assert!(!too_many_steps.is_compatible(model.as_ref()));
        prop_assert!(!too_many_factors.is_compatible(model.as_ref()));

        if last_alive > 0 {
            let dead = VegaBumpCluster::new(0, factors, last_alive - 1, rates, 0, steps).unwrap();
            prop_assert!(!dead.is_compatible(model.as_ref()));
        }
    }
}
