//! # Pricer Models (L2: Business Logic)
//!
//! Multi-factor market models for volatility-structure risk.
//!
//! This crate provides:
//! - Pseudo-root matrices and the displaced-diffusion snapshot built on them
//! - A flat-volatility factory implementing the pull-based
//!   `MarketModelFactory` capability from `pricer_core`
//!
//! ## Design Principles
//!
//! - **Static dispatch** through the `MarketModel` trait
//! - **Generic `Float`** parameters so models work for `f64` and `f32`
//! - **Immutable snapshots**: bumping returns a new model

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod models;
