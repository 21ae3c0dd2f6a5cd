//! # Pricer Risk (L4: Application)
//!
//! Vega risk for multi-factor market models.
//!
//! This crate provides:
//! - Vega bump clusters over the (factor, rate, step) grid
//! - Generated and supplied bump collections with coverage checks
//! - Pseudo-root bumping of model snapshots
//! - Rayon-based parallelisation for overlap search and bumped models
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk (L4)             │
//! ├─────────────────────────────────────────┤
//! │  vega/  - VegaBumpCluster,              │
//! │           Unverified/Verified           │
//! │           BumpCollection,               │
//! │           CoverageReport                │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │       pricer_models (L2)                │
//! │  PseudoRootModel, FlatVolFactory        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pricer_core::market_model::{EvolutionDescription, MarketModelFactory};
//! use pricer_models::models::market::FlatVolFactory;
//! use pricer_risk::VerifiedBumpCollection;
//!
//! let evolution = EvolutionDescription::new(
//!     vec![0.5, 1.0, 1.5, 2.0],
//!     vec![0.5, 1.0],
//! )
//! .unwrap();
//! let model = FlatVolFactory::new(0.03, 0.0, 0.2)
//!     .unwrap()
//!     .create(&evolution, 2)
//!     .unwrap();
//!
//! let bumps = VerifiedBumpCollection::generate(Arc::new(model), true);
//! assert_eq!(bumps.number_bumps(), 2 * (3 + 2));
//!
//! let bumped = bumps.bumped_models(1e-4).unwrap();
//! assert_eq!(bumped.len(), bumps.number_bumps());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod vega;

// Re-export commonly used types
pub use vega::{
    bump_pseudo_roots, CoverageReport, UnverifiedBumpCollection, VegaBumpCluster, VegaBumpError,
    VerifiedBumpCollection,
};
