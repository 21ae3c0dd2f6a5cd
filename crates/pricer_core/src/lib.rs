//! # pricer_core: Market Model Foundation
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the pricer crates, providing:
//! - Evolution descriptions and the alive-rate frontier (`market_model::evolution`)
//! - The market model capability and factory traits (`market_model::traits`)
//! - Error types: `EvolutionError`, `MarketModelError` (`market_model::error`)
//! - The generic `Float` trait (`traits`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_model::EvolutionDescription;
//!
//! // Quarterly forwards over one year, evolved at each reset
//! let evolution = EvolutionDescription::new(
//!     vec![0.25, 0.5, 0.75, 1.0, 1.25],
//!     vec![0.25, 0.5, 0.75, 1.0],
//! )
//! .unwrap();
//!
//! assert_eq!(evolution.number_of_rates(), 4);
//! assert_eq!(evolution.first_alive_rate(), &[0, 1, 2, 3]);
//! assert_eq!(evolution.alive_cell_count(), 4 + 3 + 2 + 1);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `EvolutionDescription`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_model;
pub mod traits;
