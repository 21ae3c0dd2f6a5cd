//! Evolution description: rate reset times, simulation steps and the
//! alive-rate frontier.
//!
//! A market model evolves a set of forward rates `F_0, ..., F_{n-1}` where
//! rate `i` accrues over `[T_i, T_{i+1})` and resets at `T_i`. The simulation
//! advances through evolution times `t_0 < t_1 < ... < t_{m-1}`. At step `j`
//! only rates that have not reset before `t_j` still carry volatility:
//!
//! ```text
//! first_alive_rate[j] = min { i : T_i >= t_j }
//! ```
//!
//! The frontier is non-decreasing in `j` because evolution times increase.

use super::error::EvolutionError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Simulation schedule of a market model.
///
/// Built either from rate and evolution times ([`EvolutionDescription::new`])
/// or directly from an alive-rate frontier
/// ([`EvolutionDescription::from_first_alive_rate`]). In the latter case the
/// time accessors return empty slices.
///
/// # Examples
///
/// ```
/// use pricer_core::market_model::EvolutionDescription;
///
/// let evolution = EvolutionDescription::new(
///     vec![0.5, 1.0, 1.5, 2.0],
///     vec![0.5, 1.0],
/// ).unwrap();
///
/// assert_eq!(evolution.number_of_rates(), 3);
/// assert_eq!(evolution.number_of_steps(), 2);
/// assert_eq!(evolution.first_alive_rate(), &[0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawEvolution"))]
pub struct EvolutionDescription {
    rate_times: Vec<f64>,
    rate_taus: Vec<f64>,
    evolution_times: Vec<f64>,
    number_of_rates: usize,
    first_alive_rate: Vec<usize>,
}

impl EvolutionDescription {
    /// Create an evolution from rate times `T_0..T_n` and evolution times.
    ///
    /// # Errors
    ///
    /// - `InsufficientRateTimes` if fewer than two rate times are given
    /// - `NoSteps` if `evolution_times` is empty
    /// - `InvalidTime` for negative or non-finite rate times and for
    ///   non-positive or non-finite evolution times
    /// - `NotIncreasing` if either schedule is not strictly increasing
    /// - `EvolutionBeyondLastReset` if the last step is after `T_{n-1}`
    pub fn new(rate_times: Vec<f64>, evolution_times: Vec<f64>) -> Result<Self, EvolutionError> {
        if rate_times.len() < 2 {
            return Err(EvolutionError::InsufficientRateTimes {
                got: rate_times.len(),
            });
        }
        if evolution_times.is_empty() {
            return Err(EvolutionError::NoSteps);
        }

        check_times("rate", &rate_times, |t| t >= 0.0)?;
        check_times("evolution", &evolution_times, |t| t > 0.0)?;

        let number_of_rates = rate_times.len() - 1;
        let last_reset = rate_times[number_of_rates - 1];
        let last_evolution = evolution_times[evolution_times.len() - 1];
        if last_evolution > last_reset {
            return Err(EvolutionError::EvolutionBeyondLastReset {
                last_evolution,
                last_reset,
            });
        }

        let rate_taus = rate_times.windows(2).map(|w| w[1] - w[0]).collect();

        let mut first_alive_rate = Vec::with_capacity(evolution_times.len());
        let mut alive = 0;
        for &t in &evolution_times {
            while rate_times[alive] < t {
                alive += 1;
            }
            first_alive_rate.push(alive);
        }

        Ok(Self {
            rate_times,
            rate_taus,
            evolution_times,
            number_of_rates,
            first_alive_rate,
        })
    }

    /// Create a time-free evolution from an alive-rate frontier.
    ///
    /// # Errors
    ///
    /// - `NoSteps` if `first_alive_rate` is empty
    /// - `InvalidFrontier` if an entry is `>= number_of_rates` or smaller
    ///   than its predecessor
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::market_model::EvolutionDescription;
    ///
    /// let evolution = EvolutionDescription::from_first_alive_rate(3, vec![0, 1]).unwrap();
    /// assert_eq!(evolution.number_of_steps(), 2);
    /// assert!(evolution.rate_times().is_empty());
    ///
    /// assert!(EvolutionDescription::from_first_alive_rate(3, vec![1, 0]).is_err());
    /// ```
    pub fn from_first_alive_rate(
        number_of_rates: usize,
        first_alive_rate: Vec<usize>,
    ) -> Result<Self, EvolutionError> {
        if first_alive_rate.is_empty() {
            return Err(EvolutionError::NoSteps);
        }

        let mut previous = 0;
        for (step, &value) in first_alive_rate.iter().enumerate() {
            if value >= number_of_rates || value < previous {
                return Err(EvolutionError::InvalidFrontier {
                    step,
                    value,
                    number_of_rates,
                });
            }
            previous = value;
        }

        Ok(Self {
            rate_times: Vec::new(),
            rate_taus: Vec::new(),
            evolution_times: Vec::new(),
            number_of_rates,
            first_alive_rate,
        })
    }

    /// Rate reset times `T_0..T_n` (empty for frontier-only evolutions).
    #[inline]
    pub fn rate_times(&self) -> &[f64] {
        &self.rate_times
    }

    /// Accrual fractions `T_{i+1} - T_i` (empty for frontier-only evolutions).
    #[inline]
    pub fn rate_taus(&self) -> &[f64] {
        &self.rate_taus
    }

    /// Simulation times (empty for frontier-only evolutions).
    #[inline]
    pub fn evolution_times(&self) -> &[f64] {
        &self.evolution_times
    }

    /// Number of forward rates.
    #[inline]
    pub fn number_of_rates(&self) -> usize {
        self.number_of_rates
    }

    /// Number of simulation steps.
    #[inline]
    pub fn number_of_steps(&self) -> usize {
        self.first_alive_rate.len()
    }

    /// Index of the first alive rate at each step.
    #[inline]
    pub fn first_alive_rate(&self) -> &[usize] {
        &self.first_alive_rate
    }

    /// Returns true if `rate` has not reset by `step`.
    ///
    /// Out-of-range indices are never alive.
    #[inline]
    pub fn is_alive(&self, rate: usize, step: usize) -> bool {
        rate < self.number_of_rates
            && self
                .first_alive_rate
                .get(step)
                .is_some_and(|&first| rate >= first)
    }

    /// Number of alive (rate, step) pairs over the whole evolution.
    pub fn alive_cell_count(&self) -> usize {
        self.first_alive_rate
            .iter()
            .map(|&first| self.number_of_rates - first)
            .sum()
    }

    /// Length of step `step` in years (first step measured from 0).
    ///
    /// Returns `None` for frontier-only evolutions or out-of-range steps.
    pub fn step_length(&self, step: usize) -> Option<f64> {
        let end = *self.evolution_times.get(step)?;
        let start = if step == 0 {
            0.0
        } else {
            self.evolution_times[step - 1]
        };
        Some(end - start)
    }
}

/// Unvalidated wire form of [`EvolutionDescription`].
///
/// Deserialisation rebuilds the description through its constructors so a
/// decoded value upholds the same invariants as a constructed one.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawEvolution {
    #[serde(default)]
    rate_times: Vec<f64>,
    #[serde(default)]
    rate_taus: Vec<f64>,
    #[serde(default)]
    evolution_times: Vec<f64>,
    number_of_rates: usize,
    first_alive_rate: Vec<usize>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawEvolution> for EvolutionDescription {
    type Error = EvolutionError;

    fn try_from(raw: RawEvolution) -> Result<Self, Self::Error> {
        if raw.rate_times.is_empty() && raw.evolution_times.is_empty() {
            if !raw.rate_taus.is_empty() {
                return Err(EvolutionError::InconsistentSchedule { field: "rate_taus" });
            }
            return Self::from_first_alive_rate(raw.number_of_rates, raw.first_alive_rate);
        }

        let evolution = Self::new(raw.rate_times, raw.evolution_times)?;
        if evolution.number_of_rates != raw.number_of_rates {
            return Err(EvolutionError::InconsistentSchedule {
                field: "number_of_rates",
            });
        }
        if evolution.first_alive_rate != raw.first_alive_rate {
            return Err(EvolutionError::InconsistentSchedule {
                field: "first_alive_rate",
            });
        }
        if !raw.rate_taus.is_empty() && evolution.rate_taus != raw.rate_taus {
            return Err(EvolutionError::InconsistentSchedule { field: "rate_taus" });
        }
        Ok(evolution)
    }
}

fn check_times(
    kind: &'static str,
    times: &[f64],
    admissible: impl Fn(f64) -> bool,
) -> Result<(), EvolutionError> {
    for (index, &value) in times.iter().enumerate() {
        if !value.is_finite() || !admissible(value) {
            return Err(EvolutionError::InvalidTime { kind, index, value });
        }
        if index > 0 && value <= times[index - 1] {
            return Err(EvolutionError::NotIncreasing {
                kind,
                index,
                previous: times[index - 1],
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frontier_from_times() {
        let evolution =
            EvolutionDescription::new(vec![0.5, 1.0, 1.5, 2.0], vec![0.5, 1.0]).unwrap();
        assert_eq!(evolution.first_alive_rate(), &[0, 1]);
        assert_eq!(evolution.number_of_rates(), 3);
        assert_eq!(evolution.number_of_steps(), 2);
    }

    #[test]
    fn test_frontier_between_resets() {
        // Steps strictly between resets: rate 0 resets at 0.5, so a step at
        // 0.75 only leaves rates 1.. alive.
        let evolution =
            EvolutionDescription::new(vec![0.5, 1.0, 1.5, 2.0], vec![0.25, 0.75, 1.5]).unwrap();
        assert_eq!(evolution.first_alive_rate(), &[0, 1, 2]);
    }

    #[test]
    fn test_rate_taus() {
        let evolution = EvolutionDescription::new(vec![0.0, 0.5, 1.5], vec![0.5]).unwrap();
        assert_relative_eq!(evolution.rate_taus()[0], 0.5);
        assert_relative_eq!(evolution.rate_taus()[1], 1.0);
    }

    #[test]
    fn test_step_length() {
        let evolution =
            EvolutionDescription::new(vec![0.5, 1.0, 1.5, 2.0], vec![0.5, 1.5]).unwrap();
        assert_relative_eq!(evolution.step_length(0).unwrap(), 0.5);
        assert_relative_eq!(evolution.step_length(1).unwrap(), 1.0);
        assert!(evolution.step_length(2).is_none());
    }

    #[test]
    fn test_insufficient_rate_times() {
        let result = EvolutionDescription::new(vec![1.0], vec![0.5]);
        assert_eq!(
            result.unwrap_err(),
            EvolutionError::InsufficientRateTimes { got: 1 }
        );
    }

    #[test]
    fn test_no_steps() {
        let result = EvolutionDescription::new(vec![0.5, 1.0], vec![]);
        assert_eq!(result.unwrap_err(), EvolutionError::NoSteps);
    }

    #[test]
    fn test_rate_times_not_increasing() {
        let result = EvolutionDescription::new(vec![0.5, 1.0, 1.0], vec![0.5]);
        assert!(matches!(
            result,
            Err(EvolutionError::NotIncreasing { kind: "rate", index: 2, .. })
        ));
    }

    #[test]
    fn test_evolution_time_must_be_positive() {
        let result = EvolutionDescription::new(vec![0.5, 1.0], vec![0.0]);
        assert!(matches!(
            result,
            Err(EvolutionError::InvalidTime { kind: "evolution", index: 0, .. })
        ));
    }

    #[test]
    fn test_nan_rate_time_rejected() {
        let result = EvolutionDescription::new(vec![0.5, f64::NAN], vec![0.5]);
        assert!(matches!(result, Err(EvolutionError::InvalidTime { .. })));
    }

    #[test]
    fn test_evolution_beyond_last_reset() {
        let result = EvolutionDescription::new(vec![0.5, 1.0, 1.5], vec![0.5, 1.2]);
        assert!(matches!(
            result,
            Err(EvolutionError::EvolutionBeyondLastReset { .. })
        ));
    }

    #[test]
    fn test_from_first_alive_rate_rejects_out_of_range() {
        let result = EvolutionDescription::from_first_alive_rate(3, vec![0, 3]);
        assert_eq!(
            result.unwrap_err(),
            EvolutionError::InvalidFrontier {
                step: 1,
                value: 3,
                number_of_rates: 3
            }
        );
    }

    #[test]
    fn test_from_first_alive_rate_rejects_decreasing() {
        let result = EvolutionDescription::from_first_alive_rate(4, vec![0, 2, 1]);
        assert!(matches!(
            result,
            Err(EvolutionError::InvalidFrontier { step: 2, .. })
        ));
    }

    #[test]
    fn test_is_alive() {
        let evolution = EvolutionDescription::from_first_alive_rate(3, vec![0, 1]).unwrap();
        assert!(evolution.is_alive(0, 0));
        assert!(!evolution.is_alive(0, 1));
        assert!(evolution.is_alive(2, 1));
        assert!(!evolution.is_alive(3, 0));
        assert!(!evolution.is_alive(0, 2));
    }

    #[test]
    fn test_alive_cell_count() {
        let evolution = EvolutionDescription::from_first_alive_rate(3, vec![0, 1]).unwrap();
        assert_eq!(evolution.alive_cell_count(), 5);
    }

    #[cfg(feature = "serde")]
    mod serde_validation {
        use super::*;

        #[test]
        fn test_round_trip_through_json() {
            let evolution =
                EvolutionDescription::new(vec![0.5, 1.0, 1.5, 2.0], vec![0.5, 1.0]).unwrap();
            let json = serde_json::to_string(&evolution).unwrap();
            let decoded: EvolutionDescription = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, evolution);

            let frontier = EvolutionDescription::from_first_alive_rate(3, vec![0, 2]).unwrap();
            let json = serde_json::to_string(&frontier).unwrap();
            assert_eq!(serde_json::from_str::<EvolutionDescription>(&json).unwrap(), frontier);
        }

        #[test]
        fn test_decreasing_frontier_rejected() {
            let json = r#"{"number_of_rates":2,"first_alive_rate":[1,0]}"#;
            assert!(serde_json::from_str::<EvolutionDescription>(json).is_err());
        }

        #[test]
        fn test_empty_frontier_rejected() {
            let json = r#"{"number_of_rates":2,"first_alive_rate":[]}"#;
            assert!(serde_json::from_str::<EvolutionDescription>(json).is_err());
        }

        #[test]
        fn test_frontier_beyond_rates_rejected() {
            let json = r#"{"number_of_rates":2,"first_alive_rate":[0,2]}"#;
            assert!(serde_json::from_str::<EvolutionDescription>(json).is_err());
        }

        #[test]
        fn test_frontier_disagreeing_with_times_rejected() {
            let json = r#"{
                "rate_times":[0.5,1.0,1.5,2.0],
                "evolution_times":[0.5,1.0],
                "number_of_rates":3,
                "first_alive_rate":[0,0]
            }"#;
            let err = serde_json::from_str::<EvolutionDescription>(json).unwrap_err();
            assert!(err.to_string().contains("first_alive_rate"));

            let json = r#"{
                "rate_times":[0.5,1.0,1.5,2.0],
                "evolution_times":[0.5,1.0],
                "number_of_rates":5,
                "first_alive_rate":[0,1]
            }"#;
            assert!(serde_json::from_str::<EvolutionDescription>(json).is_err());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_frontier_non_decreasing_and_alive(
                n_rates in 2usize..12,
                raw_steps in proptest::collection::vec(0.01f64..1.0, 1..8),
            ) {
                let rate_times: Vec<f64> = (0..=n_rates).map(|i| 0.5 * (i as f64 + 1.0)).collect();
                let last_reset = rate_times[n_rates - 1];

                let mut evolution_times: Vec<f64> = raw_steps
                    .iter()
                    .map(|u| u * last_reset)
                    .collect();
                evolution_times.sort_by(|a, b| a.partial_cmp(b).unwrap());
                evolution_times.dedup();

                let evolution = EvolutionDescription::new(rate_times.clone(), evolution_times.clone()).unwrap();
                let frontier = evolution.first_alive_rate();

                for (j, &first) in frontier.iter().enumerate() {
                    prop_assert!(first < n_rates);
                    prop_assert!(rate_times[first] >= evolution_times[j]);
                    if first > 0 {
                        prop_assert!(rate_times[first - 1] < evolution_times[j]);
                    }
                    if j > 0 {
                        prop_assert!(first >= frontier[j - 1]);
                    }
                }
            }
        }
    }
}
