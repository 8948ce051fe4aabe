//! Command-line interface definitions and argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cluster::{AnalyzerConfig, DEFAULT_ROUND_SIZE, DEFAULT_THRESHOLD_M};
use crate::error::{Error, Result};
use crate::sample::{DistanceBands, FarthestPointSampler};

/// Geographic point clustering and spatial sampling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cluster each round of points and report the label distribution
    Clusters {
        /// CSV with Test_Round, Latitude and Longitude columns
        #[arg(short, long)]
        input: PathBuf,

        /// Adjacency threshold in meters
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD_M)]
        threshold: f64,

        /// Expected number of points per round
        #[arg(short = 'n', long, default_value_t = DEFAULT_ROUND_SIZE)]
        round_size: usize,

        /// Write the per-round summary table here
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Write the per-pair distance table here
        #[arg(long)]
        pairs: Option<PathBuf>,
    },

    /// Reduce a pool of points to a spatially spread subset
    Sample {
        /// CSV with Latitude and Longitude columns
        #[arg(short, long)]
        input: PathBuf,

        /// Number of points to keep
        #[arg(short = 'k', long, default_value_t = 100)]
        target: usize,

        /// Seed for the initial pick
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Distance band edges in meters, comma-separated
        /// Example: --bands "100,500" for <100m, 100-500m, >=500m
        #[arg(short, long, default_value = "100,500")]
        bands: String,

        /// Write the selected coordinates here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the input rows located at selected coordinates here
        #[arg(long)]
        filtered: Option<PathBuf>,
    },
}

/// Build the analyzer configuration for the `clusters` command.
pub fn analyzer_config(threshold: f64, round_size: usize) -> Result<AnalyzerConfig> {
    let config = AnalyzerConfig::default()
        .with_threshold(threshold)
        .with_round_size(round_size);
    config.validate()?;
    Ok(config)
}

/// Build the sampler for the `sample` command.
pub fn sampler(target: usize, seed: u64) -> Result<FarthestPointSampler> {
    if target == 0 {
        return Err(Error::DegenerateConfiguration {
            name: "target",
            message: "must be at least 1",
        });
    }
    Ok(FarthestPointSampler::new(target).with_seed(seed))
}

/// Parse band edges from a comma-separated string such as `"100,500"`.
pub fn parse_bands(raw: &str) -> Result<DistanceBands> {
    let raw = raw.trim();
    if raw.is_empty() {
        return DistanceBands::new(Vec::new());
    }
    let edges = raw
        .split(',')
        .map(|part| {
            part.trim().parse::<f64>().map_err(|_| Error::InvalidParameter {
                name: "bands",
                message: format!("invalid band edge: {part}"),
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    DistanceBands::new(edges)
}
