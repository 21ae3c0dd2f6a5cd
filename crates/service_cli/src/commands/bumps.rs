//! Vega bump partition commands.
//!
//! `generate` builds the canonical partition for the configured model.
//! `check` validates the explicit partition listed in the configuration.

use std::fmt;
use std::sync::Arc;

use pricer_models::models::market::PseudoRootModel;
use pricer_risk::vega::{
    CoverageReport, UnverifiedBumpCollection, VegaBumpCluster, VerifiedBumpCollection,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::{CliError, Result};

#[derive(Serialize)]
struct GenerateOutput<'a> {
    number_bumps: usize,
    factorwise: bool,
    bumps: &'a [VegaBumpCluster],
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    number_bumps: usize,
    full: bool,
    non_overlapping: bool,
    sensible: bool,
    coverage: &'a CoverageReport,
    overlapping_pairs: &'a [(usize, usize)],
}

/// Run `bumps generate`.
pub fn run_generate(config: &CliConfig, factorwise: bool, format: &str) -> Result<()> {
    let output = generate(config, factorwise, format)?;
    println!("{}", output);
    Ok(())
}

/// Run `bumps check`. Fails when the partition is not sensible.
pub fn run_check(config: &CliConfig, format: &str) -> Result<()> {
    let (output, collection) = check(config, format)?;
    println!("{}", output);
    collection.verify()?;
    info!("Partition is sensible");
    Ok(())
}

fn generate(config: &CliConfig, factorwise: bool, format: &str) -> Result<String> {
    let factorwise = factorwise || config.bumps.factorwise;
    let model = Arc::new(config.build_model()?);
    let collection = VerifiedBumpCollection::generate(model, factorwise);
    info!(
        bumps = collection.number_bumps(),
        factorwise, "Generated vega bump partition"
    );

    match format {
        "json" => Ok(serde_json::to_string_pretty(&GenerateOutput {
            number_bumps: collection.number_bumps(),
            factorwise,
            bumps: collection.all_bumps(),
        })?),
        "table" => Ok(ClusterTable(collection.all_bumps()).to_string()),
        other => Err(unknown_format(other)),
    }
}

fn check(
    config: &CliConfig,
    format: &str,
) -> Result<(String, UnverifiedBumpCollection<PseudoRootModel<f64>>)> {
    if config.bumps.clusters.is_empty() {
        return Err(CliError::InvalidArgument(
            "no [[bumps.clusters]] entries in configuration".to_string(),
        ));
    }
    let model = Arc::new(config.build_model()?);
    let collection = UnverifiedBumpCollection::new(config.build_clusters()?, model)?;
    let pairs = collection.overlapping_pairs();
    let coverage = collection.coverage();
    if !coverage.is_sensible() {
        warn!(
            uncovered = coverage.uncovered().len(),
            excess_markings = coverage.excess_markings(),
            "Partition is not sensible"
        );
    }

    let output = match format {
        "json" => serde_json::to_string_pretty(&CheckOutput {
            number_bumps: collection.number_bumps(),
            full: coverage.is_full(),
            non_overlapping: coverage.is_non_overlapping(),
            sensible: coverage.is_sensible(),
            coverage,
            overlapping_pairs: &pairs,
        })?,
        "table" => CheckTable {
            collection: &collection,
            pairs: &pairs,
        }
        .to_string(),
        other => return Err(unknown_format(other)),
    };
    Ok((output, collection))
}

fn unknown_format(format: &str) -> CliError {
    CliError::InvalidArgument(format!(
        "Unknown format: {}. Supported: json, table",
        format
    ))
}

/// Box-drawn listing of clusters.
struct ClusterTable<'a>(&'a [VegaBumpCluster]);

impl fmt::Display for ClusterTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "┌───────┬──────────┬──────────┬──────────┐")?;
        writeln!(f, "│ Index │ Factors  │ Rates    │ Steps    │")?;
        writeln!(f, "├───────┼──────────┼──────────┼──────────┤")?;
        for (i, b) in self.0.iter().enumerate() {
            writeln!(
                f,
                "│ {:>5} │ {:<8} │ {:<8} │ {:<8} │",
                i,
                format!("[{},{})", b.factor_begin(), b.factor_end()),
                format!("[{},{})", b.rate_begin(), b.rate_end()),
                format!("[{},{})", b.step_begin(), b.step_end()),
            )?;
        }
        write!(f, "└───────┴──────────┴──────────┴──────────┘")
    }
}

/// Cluster listing followed by the coverage verdict and diagnostics.
struct CheckTable<'a> {
    collection: &'a UnverifiedBumpCollection<PseudoRootModel<f64>>,
    pairs: &'a [(usize, usize)],
}

impl fmt::Display for CheckTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coverage = self.collection.coverage();
        writeln!(f, "{}", ClusterTable(self.collection.all_bumps()))?;
        writeln!(f)?;
        writeln!(f, "Full:            {}", coverage.is_full())?;
        writeln!(f, "Non-overlapping: {}", coverage.is_non_overlapping())?;
        write!(f, "Sensible:        {}", coverage.is_sensible())?;
        for cell in coverage.uncovered() {
            write!(
                f,
                "\n  uncovered: factor {} rate {} step {}",
                cell.factor, cell.rate, cell.step
            )?;
        }
        for (a, b) in self.pairs {
            write!(f, "\n  overlap: bump {} and bump {}", a, b)?;
        }
        Ok(())
    }
}
