//! geocluster: round clustering and farthest-point sampling of geographic points
//!
//! Entry point wiring CSV input, the analysis routines, and report output.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use geocluster::cli::{self, Cli, Commands};
use geocluster::cluster::{describe_label, group_rounds, RoundAnalyzer};
use geocluster::io;
use geocluster::sample::{pairwise_distances, DistanceBands, DistanceSummary};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Clusters {
            input,
            threshold,
            round_size,
            summary,
            pairs,
        } => run_clusters(&input, threshold, round_size, summary.as_deref(), pairs.as_deref()),
        Commands::Sample {
            input,
            target,
            seed,
            bands,
            output,
            filtered,
        } => run_sample(
            &input,
            target,
            seed,
            &bands,
            output.as_deref(),
            filtered.as_deref(),
        ),
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

/// Cluster every round in `input` and print the label distribution
fn run_clusters(
    input: &Path,
    threshold: f64,
    round_size: usize,
    summary: Option<&Path>,
    pairs: Option<&Path>,
) -> Result<()> {
    // Reject bad parameters before reading anything.
    let config = cli::analyzer_config(threshold, round_size)?;
    let start = Instant::now();

    let records = io::read_round_records(open(input)?)
        .with_context(|| format!("failed to read rounds from {}", input.display()))?;
    let rounds = group_rounds(records);
    info!(rounds = rounds.len(), input = %input.display(), "loaded rounds");

    let report = RoundAnalyzer::new(config).analyze(&rounds)?;

    if let Some(path) = summary {
        io::write_round_summary(create(path)?, &report)?;
        info!(path = %path.display(), "wrote round summary");
    }
    if let Some(path) = pairs {
        io::write_pair_details(create(path)?, &report)?;
        info!(path = %path.display(), "wrote pair details");
    }

    println!("\nLabel Distribution ({} rounds, threshold {}m)", report.processed(), threshold);
    println!("{:<10} {:<40} {:<10} {:<10}", "Label", "Meaning", "Count", "Percentage");
    println!("{}", "-".repeat(70));
    for (label, count) in report.distribution.iter() {
        println!(
            "{:<10} {:<40} {:<10} {:.1}%",
            label,
            describe_label(label, round_size, threshold),
            count,
            report.distribution.percentage(label)
        );
    }
    if report.skipped_count() > 0 {
        println!("\nSkipped rounds: {}", report.skipped_count());
        for skipped in &report.skipped {
            println!("  round {}: {}", skipped.round_id, skipped.reason);
        }
    }

    info!(elapsed_s = start.elapsed().as_secs_f64(), "clustering complete");
    Ok(())
}

/// Sample a spread subset of the pool in `input` and print distance statistics
fn run_sample(
    input: &Path,
    target: usize,
    seed: u64,
    bands: &str,
    output: Option<&Path>,
    filtered: Option<&Path>,
) -> Result<()> {
    let sampler = cli::sampler(target, seed)?;
    let bands: DistanceBands = cli::parse_bands(bands)?;
    let start = Instant::now();

    let raw = io::read_points(open(input)?)
        .with_context(|| format!("failed to read points from {}", input.display()))?;
    let pool = io::dedup_points(&raw);
    info!(rows = raw.len(), unique = pool.len(), "loaded sampling pool");

    let outcome = sampler.sample(&pool)?;
    println!(
        "\nSelected {} of {} locations ({} rejected, {} distance evaluations)",
        outcome.len(),
        pool.len(),
        outcome.rejected,
        outcome.evaluations
    );

    let distances = pairwise_distances(&outcome.selected)?;
    match DistanceSummary::from_distances(&distances) {
        Some(s) => {
            println!("\nDistance Statistics:");
            println!("  Minimum distance: {:.0} meters", s.min);
            println!("  Maximum distance: {:.0} meters", s.max);
            println!("  Average distance: {:.0} meters", s.mean);
            println!("  Median distance: {:.0} meters", s.median);

            println!("\nDistance Distribution:");
            for band in bands.count(&distances) {
                println!("  Pairs {}: {}", band.label(), band.count);
            }
        }
        None => println!("\nFewer than two locations selected; no distance statistics"),
    }

    if let Some(path) = output {
        io::write_points(create(path)?, &outcome.selected)?;
        info!(path = %path.display(), "wrote selected coordinates");
    }
    if let Some(path) = filtered {
        let rows = io::filter_rows_by_points(open(input)?, create(path)?, &outcome.selected)?;
        info!(path = %path.display(), rows, original = raw.len(), "wrote filtered rows");
    }

    info!(elapsed_s = start.elapsed().as_secs_f64(), "sampling complete");
    Ok(())
}
