//! Market models for multi-factor rate evolution.
//!
//! - [`market::PseudoRootModel`]: per-step pseudo-root snapshot of a
//!   displaced-diffusion forward-rate model
//! - [`market::FlatVolFactory`]: builds flat-volatility snapshots for any
//!   evolution and factor count

pub mod market;
