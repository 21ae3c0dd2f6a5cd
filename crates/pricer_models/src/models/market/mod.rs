//! Forward-rate market models described by per-step pseudo-roots.
//!
//! - [`PseudoRootModel`]: immutable snapshot of initial rates, displacements,
//!   evolution and one factor-loading matrix per step
//! - [`PseudoRootMatrix`]: dense `rates x factors` loading matrix
//! - [`FlatVolFactory`]: pull-based factory producing flat-volatility models
//!
//! [`PseudoRootModel`] implements [`pricer_core::market_model::MarketModel`], the
//! capability consumed by vega bump construction in `pricer_risk`.

pub mod flat_vol;
pub mod pseudo_root;

pub use flat_vol::FlatVolFactory;
pub use pseudo_root::{PseudoRootMatrix, PseudoRootModel};
