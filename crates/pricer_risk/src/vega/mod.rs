//! Vega bump partitions for multi-factor market models.
//!
//! Vega sensitivities of a market model are estimated by bumping regions of
//! its per-step pseudo-root matrices. The (factor, rate, step) grid is split
//! into axis-aligned clusters, and each alive cell (rate not yet reset at
//! that step) must be bumped by exactly one cluster: a gap drops risk, an
//! overlap double counts it, and neither raises an error downstream.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                 Vega bump partitions              │
//! ├───────────────────────────────────────────────────┤
//! │  VegaBumpCluster          - one bumped box        │
//! │  UnverifiedBumpCollection - supplied partition    │
//! │        │ verify()                                 │
//! │        ▼                                          │
//! │  VerifiedBumpCollection   - exact partition       │
//! │  CoverageReport           - gaps and overlaps     │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pricer_core::market_model::EvolutionDescription;
//! use pricer_models::models::market::{PseudoRootMatrix, PseudoRootModel};
//! use pricer_risk::vega::{UnverifiedBumpCollection, VerifiedBumpCollection};
//!
//! let evolution = EvolutionDescription::from_first_alive_rate(3, vec![0, 1]).unwrap();
//! let model = Arc::new(
//!     PseudoRootModel::new(
//!         vec![0.03; 3],
//!         vec![0.0; 3],
//!         evolution,
//!         vec![PseudoRootMatrix::zeros(3, 2), PseudoRootMatrix::zeros(3, 2)],
//!     )
//!     .unwrap(),
//! );
//!
//! let generated = VerifiedBumpCollection::generate(model.clone(), false);
//! assert_eq!(generated.number_bumps(), 5);
//!
//! // Drop one cluster: the partition now has a gap
//! let mut bumps = generated.into_bumps();
//! bumps.pop();
//! let supplied = UnverifiedBumpCollection::new(bumps, model).unwrap();
//! assert!(!supplied.is_full());
//! assert!(supplied.verify().is_err());
//! ```

mod bump;
mod cluster;
mod collection;
mod coverage;
mod error;

pub use bump::bump_pseudo_roots;
pub use cluster::{BumpAxis, VegaBumpCluster};
pub use collection::{UnverifiedBumpCollection, VerifiedBumpCollection, PARALLEL_PAIR_THRESHOLD};
pub use coverage::{CoverageReport, GridCell};
pub use error::VegaBumpError;
