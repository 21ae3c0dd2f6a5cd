//! TOML configuration for the CLI.
//!
//! ```toml
//! [model]
//! number_of_factors = 2
//! initial_rate = 0.03
//! displacement = 0.0
//! volatility = 0.20
//!
//! [model.evolution]
//! rate_times = [0.5, 1.0, 1.5, 2.0]
//! evolution_times = [0.5, 1.0]
//!
//! [bumps]
//! factorwise = false
//!
//! [[bumps.clusters]]
//! factors = [0, 2]
//! rates = [0, 3]
//! steps = [0, 1]
//! ```
//!
//! The evolution may instead be given as a frontier:
//! `number_of_rates = 3` and `first_alive_rate = [0, 1]`. Frontier-only
//! models carry zero pseudo-roots and are meant for partition checks.

use std::path::Path;

use pricer_core::market_model::{EvolutionDescription, MarketModelFactory};
use pricer_models::models::market::{FlatVolFactory, PseudoRootMatrix, PseudoRootModel};
use pricer_risk::vega::VegaBumpCluster;
use serde::Deserialize;
use tracing::debug;

use crate::{CliError, Result};

/// Root of the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Market model description.
    pub model: ModelConfig,
    /// Bump partition settings.
    #[serde(default)]
    pub bumps: BumpsConfig,
}

/// Market model section.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Number of Brownian factors.
    pub number_of_factors: usize,
    /// Evolution schedule.
    pub evolution: EvolutionConfig,
    /// Flat initial forward rate.
    #[serde(default = "default_initial_rate")]
    pub initial_rate: f64,
    /// Flat displacement.
    #[serde(default)]
    pub displacement: f64,
    /// Flat volatility.
    #[serde(default = "default_volatility")]
    pub volatility: f64,
}

/// Evolution given by times or directly by its alive-rate frontier.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EvolutionConfig {
    /// Rate reset times and simulation times.
    Times {
        /// Rate times `T_0..T_n`.
        rate_times: Vec<f64>,
        /// Evolution times.
        evolution_times: Vec<f64>,
    },
    /// Alive-rate frontier.
    Frontier {
        /// Number of rates.
        number_of_rates: usize,
        /// First alive rate per step.
        first_alive_rate: Vec<usize>,
    },
}

/// Bump partition section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BumpsConfig {
    /// Bump each factor separately when generating.
    #[serde(default)]
    pub factorwise: bool,
    /// Explicit partition for `bumps check`.
    #[serde(default)]
    pub clusters: Vec<ClusterConfig>,
}

/// One cluster as `[begin, end)` pairs.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ClusterConfig {
    /// Factor range.
    pub factors: [usize; 2],
    /// Rate range.
    pub rates: [usize; 2],
    /// Step range.
    pub steps: [usize; 2],
}

fn default_initial_rate() -> f64 {
    0.03
}

fn default_volatility() -> f64 {
    0.20
}

impl CliConfig {
    /// Load and parse a configuration file.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(CliError::FileNotFound(path.to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::parse(&text)?;
        debug!(path, "configuration loaded");
        Ok(config)
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Build the configured market model snapshot.
    pub fn build_model(&self) -> Result<PseudoRootModel<f64>> {
        let model = &self.model;
        match &model.evolution {
            EvolutionConfig::Times {
                rate_times,
                evolution_times,
            } => {
                let evolution =
                    EvolutionDescription::new(rate_times.clone(), evolution_times.clone())?;
                let factory =
                    FlatVolFactory::new(model.initial_rate, model.displacement, model.volatility)?;
                Ok(factory.create(&evolution, model.number_of_factors)?)
            }
            EvolutionConfig::Frontier {
                number_of_rates,
                first_alive_rate,
            } => {
                let evolution = EvolutionDescription::from_first_alive_rate(
                    *number_of_rates,
                    first_alive_rate.clone(),
                )?;
                let steps = evolution.number_of_steps();
                Ok(PseudoRootModel::new(
                    vec![model.initial_rate; *number_of_rates],
                    vec![model.displacement; *number_of_rates],
                    evolution,
                    vec![PseudoRootMatrix::zeros(*number_of_rates, model.number_of_factors); steps],
                )?)
            }
        }
    }

    /// Build the explicit clusters listed under `[[bumps.clusters]]`.
    pub fn build_clusters(&self) -> Result<Vec<VegaBumpCluster>> {
        self.bumps
            .clusters
            .iter()
            .map(|c| {
                VegaBumpCluster::new(
                    c.factors[0],
                    c.factors[1],
                    c.rates[0],
                    c.rates[1],
                    c.steps[0],
                    c.steps[1],
                )
                .map_err(CliError::from)
            })
            .collect()
    }
}
