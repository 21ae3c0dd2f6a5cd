//! Market model capability for volatility-structure risk.
//!
//! This module provides the read-only view of a multi-factor market model
//! that sensitivity code consumes:
//! - [`EvolutionDescription`]: rate times, evolution times and the
//!   alive-rate frontier
//! - [`MarketModel`]: grid dimensions and evolution of a model
//! - [`MarketModelFactory`]: pull-based creation of model snapshots
//! - [`error`]: evolution and model construction errors
//!
//! # Example
//!
//! ```
//! use pricer_core::market_model::EvolutionDescription;
//!
//! let evolution = EvolutionDescription::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0]).unwrap();
//! assert_eq!(evolution.first_alive_rate(), &[0, 1]);
//! assert!(!evolution.is_alive(0, 1));
//! ```

pub mod error;
pub mod evolution;
pub mod traits;

pub use error::{EvolutionError, MarketModelError};
pub use evolution::EvolutionDescription;
pub use traits::{MarketModel, MarketModelFactory};
