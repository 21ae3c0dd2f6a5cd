//! Pseudo-root market model.
//!
//! A multi-factor forward-rate model is fully described, for simulation
//! purposes, by one pseudo-root matrix `A_j` per evolution step `j`:
//!
//! ```text
//! C_j = A_j * A_j^T
//! ```
//!
//! where `C_j` is the covariance of log-displaced rate increments over the
//! step and `A_j[r][f]` is the loading of rate `r` on factor `f`. Vega
//! sensitivities are computed by bumping regions of these matrices.

use std::ops::Range;

use pricer_core::market_model::{
    EvolutionDescription, EvolutionError, MarketModel, MarketModelError,
};
use pricer_core::traits::Float;

/// Dense `rates x factors` factor-loading matrix for one step.
///
/// Stored row-major: entry `(rate, factor)` lives at `rate * factors + factor`.
#[derive(Clone, Debug, PartialEq)]
pub struct PseudoRootMatrix<T: Float> {
    rates: usize,
    factors: usize,
    data: Vec<T>,
}

impl<T: Float> PseudoRootMatrix<T> {
    /// Create a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `data.len() != rates * factors`
    /// - `NonFinite` if any entry is NaN or infinite
    pub fn new(rates: usize, factors: usize, data: Vec<T>) -> Result<Self, MarketModelError> {
        if data.len() != rates * factors {
            return Err(MarketModelError::DimensionMismatch {
                what: "pseudo-root entries",
                expected: rates * factors,
                actual: data.len(),
            });
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(MarketModelError::NonFinite("pseudo-root"));
        }
        Ok(Self {
            rates,
            factors,
            data,
        })
    }

    /// Create a matrix from one row per rate.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` for ragged rows, `NonFinite` for NaN entries.
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_models::models::market::PseudoRootMatrix;
    ///
    /// let a = PseudoRootMatrix::from_rows(vec![vec![0.1, 0.0], vec![0.05, 0.05]]).unwrap();
    /// assert_eq!(a.rates(), 2);
    /// assert_eq!(a.factors(), 2);
    /// assert_eq!(a.get(1, 0), Some(0.05));
    /// ```
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, MarketModelError> {
        let rates = rows.len();
        let factors = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rates * factors);
        for row in rows {
            if row.len() != factors {
                return Err(MarketModelError::DimensionMismatch {
                    what: "pseudo-root row",
                    expected: factors,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }
        Self::new(rates, factors, data)
    }

    /// Create a zero matrix.
    pub fn zeros(rates: usize, factors: usize) -> Self {
        Self {
            rates,
            factors,
            data: vec![T::zero(); rates * factors],
        }
    }

    /// Number of rows (rates).
    #[inline]
    pub fn rates(&self) -> usize {
        self.rates
    }

    /// Number of columns (factors).
    #[inline]
    pub fn factors(&self) -> usize {
        self.factors
    }

    /// Loading of `rate` on `factor`.
    #[inline]
    pub fn get(&self, rate: usize, factor: usize) -> Option<T> {
        if rate < self.rates && factor < self.factors {
            Some(self.data[rate * self.factors + factor])
        } else {
            None
        }
    }

    /// Factor loadings of one rate.
    #[inline]
    pub fn row(&self, rate: usize) -> Option<&[T]> {
        if rate < self.rates {
            Some(&self.data[rate * self.factors..(rate + 1) * self.factors])
        } else {
            None
        }
    }

    /// Covariance `A * A^T` as a dense `rates x rates` matrix.
    pub fn covariance(&self) -> Vec<Vec<T>> {
        let mut cov = vec![vec![T::zero(); self.rates]; self.rates];
        for i in 0..self.rates {
            for j in 0..=i {
                let mut sum = T::zero();
                for f in 0..self.factors {
                    sum = sum + self.data[i * self.factors + f] * self.data[j * self.factors + f];
                }
                cov[i][j] = sum;
                cov[j][i] = sum;
            }
        }
        cov
    }

    fn shift_block(&mut self, rates: Range<usize>, factors: Range<usize>, amount: T) {
        for r in rates {
            for f in factors.clone() {
                let idx = r * self.factors + f;
                self.data[idx] = self.data[idx] + amount;
            }
        }
    }
}

/// Market model given directly by its per-step pseudo-roots.
///
/// Immutable snapshot: bumping produces a new model
/// ([`PseudoRootModel::with_bumped_pseudo_roots`]).
///
/// # Example
///
/// ```
/// use pricer_core::market_model::{EvolutionDescription, MarketModel};
/// use pricer_models::models::market::{PseudoRootMatrix, PseudoRootModel};
///
/// let evolution = EvolutionDescription::new(vec![0.5, 1.0, 1.5], vec![0.5]).unwrap();
/// let a = PseudoRootMatrix::from_rows(vec![vec![0.1], vec![0.1]]).unwrap();
///
/// let model = PseudoRootModel::new(vec![0.03, 0.035], vec![0.0, 0.0], evolution, vec![a]).unwrap();
/// assert_eq!(model.number_of_rates(), 2);
/// assert_eq!(model.number_of_factors(), 1);
/// assert_eq!(model.number_of_steps(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PseudoRootModel<T: Float> {
    initial_rates: Vec<T>,
    displacements: Vec<T>,
    evolution: EvolutionDescription,
    number_of_factors: usize,
    pseudo_roots: Vec<PseudoRootMatrix<T>>,
}

impl<T: Float> PseudoRootModel<T> {
    /// Create a model after checking every dimension against the evolution.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the initial rates, displacements, number of
    ///   pseudo-roots or their shapes disagree with the evolution
    /// - `NoFactors` if the pseudo-roots have zero columns
    /// - `NonFinite` for NaN or infinite rates and displacements
    pub fn new(
        initial_rates: Vec<T>,
        displacements: Vec<T>,
        evolution: EvolutionDescription,
        pseudo_roots: Vec<PseudoRootMatrix<T>>,
    ) -> Result<Self, MarketModelError> {
        let n_rates = evolution.number_of_rates();
        let n_steps = evolution.number_of_steps();

        check_len("initial rates", n_rates, initial_rates.len())?;
        check_len("displacements", n_rates, displacements.len())?;
        check_len("pseudo-roots", n_steps, pseudo_roots.len())?;

        if initial_rates.iter().any(|x| !x.is_finite()) {
            return Err(MarketModelError::NonFinite("initial rates"));
        }
        if displacements.iter().any(|x| !x.is_finite()) {
            return Err(MarketModelError::NonFinite("displacements"));
        }

        let number_of_factors = pseudo_roots
            .first()
            .map(PseudoRootMatrix::factors)
            .ok_or(MarketModelError::Evolution(EvolutionError::NoSteps))?;
        if number_of_factors == 0 {
            return Err(MarketModelError::NoFactors);
        }
        for a in &pseudo_roots {
            check_len("pseudo-root rows", n_rates, a.rates())?;
            check_len("pseudo-root columns", number_of_factors, a.factors())?;
        }

        Ok(Self {
            initial_rates,
            displacements,
            evolution,
            number_of_factors,
            pseudo_roots,
        })
    }

    /// Initial forward rates.
    #[inline]
    pub fn initial_rates(&self) -> &[T] {
        &self.initial_rates
    }

    /// Rate displacements.
    #[inline]
    pub fn displacements(&self) -> &[T] {
        &self.displacements
    }

    /// Pseudo-root of step `step`.
    #[inline]
    pub fn pseudo_root(&self, step: usize) -> Option<&PseudoRootMatrix<T>> {
        self.pseudo_roots.get(step)
    }

    /// Covariance of step `step`.
    pub fn covariance(&self, step: usize) -> Option<Vec<Vec<T>>> {
        self.pseudo_roots.get(step).map(PseudoRootMatrix::covariance)
    }

    /// Covariance accumulated over steps `0..=end_step`.
    pub fn total_covariance(&self, end_step: usize) -> Option<Vec<Vec<T>>> {
        if end_step >= self.pseudo_roots.len() {
            return None;
        }
        let n = self.evolution.number_of_rates();
        let mut total = vec![vec![T::zero(); n]; n];
        for a in &self.pseudo_roots[..=end_step] {
            let cov = a.covariance();
            for (total_row, cov_row) in total.iter_mut().zip(&cov) {
                for (t, c) in total_row.iter_mut().zip(cov_row) {
                    *t = *t + *c;
                }
            }
        }
        Some(total)
    }

    /// Return a new model with `amount` added to every pseudo-root entry in
    /// the box `factors x rates x steps`. The receiver is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a range is empty or exceeds the grid,
    /// `NonFinite` if `amount` is NaN or infinite.
    pub fn with_bumped_pseudo_roots(
        &self,
        factors: Range<usize>,
        rates: Range<usize>,
        steps: Range<usize>,
        amount: T,
    ) -> Result<Self, MarketModelError> {
        if !amount.is_finite() {
            return Err(MarketModelError::NonFinite("bump amount"));
        }
        check_range("factor", &factors, self.number_of_factors)?;
        check_range("rate", &rates, self.evolution.number_of_rates())?;
        check_range("step", &steps, self.evolution.number_of_steps())?;

        let mut bumped = self.clone();
        for s in steps {
            bumped.pseudo_roots[s].shift_block(rates.clone(), factors.clone(), amount);
        }
        Ok(bumped)
    }
}

impl<T: Float> MarketModel for PseudoRootModel<T> {
    fn number_of_factors(&self) -> usize {
        self.number_of_factors
    }

    fn evolution(&self) -> &EvolutionDescription {
        &self.evolution
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), MarketModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(MarketModelError::DimensionMismatch {
            what,
            expected,
            actual,
        })
    }
}

fn check_range(axis: &str, range: &Range<usize>, len: usize) -> Result<(), MarketModelError> {
    if range.start >= range.end || range.end > len {
        return Err(MarketModelError::InvalidParameter(format!(
            "{} range {}..{} outside 0..{}",
            axis, range.start, range.end, len
        )));
    }
    Ok(())
}
