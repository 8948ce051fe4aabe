//! End-to-end tests over CSV files.

use std::fs::File;
use std::io::{BufReader, Write};

use geocluster::cluster::{group_rounds, AnalyzerConfig, RoundAnalyzer};
use geocluster::io;
use geocluster::sample::{pairwise_distances, DistanceBands, DistanceSummary};
use geocluster::{Error, FarthestPointSampler, Point};
use tempfile::NamedTempFile;

/// Five rounds of five points in Melbourne's CBD.
///
/// - round 1: all points far apart (label 1)
/// - round 2: points 1 and 2 ~50 m apart (label 2)
/// - round 3: a 3-point chain at ~111 m steps (label 3, 2 near pairs)
/// - round 4: only four points (skipped)
/// - round 5: all within a few meters (label 5)
fn create_rounds_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Test_Round,Rank,Latitude,Longitude,Score").unwrap();

    let spread = [
        (-37.8100, 144.9600),
        (-37.8150, 144.9700),
        (-37.8200, 144.9500),
        (-37.8050, 144.9800),
        (-37.8250, 144.9650),
    ];
    for (rank, (lat, lon)) in spread.iter().enumerate() {
        writeln!(file, "1,{},{lat},{lon},0.9", rank + 1).unwrap();
    }

    let mut pair = spread;
    pair[1] = (-37.81045, 144.9600);
    for (rank, (lat, lon)) in pair.iter().enumerate() {
        writeln!(file, "2,{},{lat},{lon},0.8", rank + 1).unwrap();
    }

    let mut chain = spread;
    chain[1] = (-37.8110, 144.9600);
    chain[2] = (-37.8120, 144.9600);
    for (rank, (lat, lon)) in chain.iter().enumerate() {
        writeln!(file, "3,{},{lat},{lon},0.7", rank + 1).unwrap();
    }

    for (rank, (lat, lon)) in spread.iter().take(4).enumerate() {
        writeln!(file, "4,{},{lat},{lon},0.6", rank + 1).unwrap();
    }

    for rank in 0..5 {
        let lat = -37.8100 + rank as f64 * 0.00001;
        writeln!(file, "5,{},{lat},144.96,0.5", rank + 1).unwrap();
    }

    file
}

#[test]
fn test_round_pipeline() {
    let input = create_rounds_csv();
    let records = io::read_round_records(BufReader::new(File::open(input.path()).unwrap())).unwrap();
    assert_eq!(records.len(), 24);

    let rounds = group_rounds(records);
    assert_eq!(rounds.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);

    let report = RoundAnalyzer::new(AnalyzerConfig::default()).analyze(&rounds).unwrap();
    assert_eq!(report.processed(), 4);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped[0].round_id, 4);
    assert!(matches!(report.skipped[0].reason, Error::IncompleteRound { found: 4, .. }));

    let labels: Vec<usize> = report.results.iter().map(|r| r.label()).collect();
    assert_eq!(labels, vec![1, 2, 3, 5]);

    let near: Vec<usize> = report.results.iter().map(|r| r.near_pair_count).collect();
    assert_eq!(near, vec![0, 1, 2, 10]);

    assert_eq!(report.results[1].clusters, vec![vec![0, 1], vec![2], vec![3], vec![4]]);
    assert_eq!(report.results[2].clusters, vec![vec![0, 1, 2], vec![3], vec![4]]);

    let total: f64 = report
        .distribution
        .iter()
        .map(|(label, _)| report.distribution.percentage(label))
        .sum();
    assert!((total - 100.0).abs() < 1e-9);
    assert_eq!(report.distribution.percentage(3), 25.0);

    let summary = NamedTempFile::new().unwrap();
    io::write_round_summary(File::create(summary.path()).unwrap(), &report).unwrap();
    let text = std::fs::read_to_string(summary.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3], "3,3,3,3,2");
    assert_eq!(lines[4], "5,5,5,1,10");

    let pairs = NamedTempFile::new().unwrap();
    io::write_pair_details(File::create(pairs.path()).unwrap(), &report).unwrap();
    let text = std::fs::read_to_string(pairs.path()).unwrap();
    assert_eq!(text.lines().count(), 1 + 4 * 10);
}

#[test]
fn test_sampling_pipeline() {
    let mut input = NamedTempFile::new().unwrap();
    writeln!(input, "Latitude,Longitude,Crowd").unwrap();
    // 10 x 10 grid, ~110 m spacing; every location appears twice.
    for repeat in 0..2 {
        for r in 0..10 {
            for c in 0..10 {
                let lat = -37.80 - r as f64 * 0.001;
                let lon = 144.95 + c as f64 * 0.00125;
                writeln!(input, "{lat},{lon},{}", repeat * 100 + r * 10 + c).unwrap();
            }
        }
    }

    let raw = io::read_points(File::open(input.path()).unwrap()).unwrap();
    assert_eq!(raw.len(), 200);
    let pool = io::dedup_points(&raw);
    assert_eq!(pool.len(), 100);

    let outcome = FarthestPointSampler::new(4)
        .with_initial_index(0)
        .sample(&pool)
        .unwrap();
    assert_eq!(outcome.len(), 4);
    // From a corner, the farthest point is the opposite corner.
    assert_eq!(outcome.indices[1], 99);
    // Then the two remaining corners.
    let mut corners = outcome.indices[2..].to_vec();
    corners.sort_unstable();
    assert_eq!(corners, vec![9, 90]);

    let distances = pairwise_distances(&outcome.selected).unwrap();
    let summary = DistanceSummary::from_distances(&distances).unwrap();
    assert_eq!(summary.count, 6);
    assert!(summary.min > 900.0);
    assert!(summary.max > summary.min);

    let bands = DistanceBands::default().count(&distances);
    assert_eq!(bands.iter().map(|b| b.count).sum::<usize>(), 6);
    assert_eq!(bands[2].count, 6);

    let filtered = NamedTempFile::new().unwrap();
    let rows = io::filter_rows_by_points(
        File::open(input.path()).unwrap(),
        File::create(filtered.path()).unwrap(),
        &outcome.selected,
    )
    .unwrap();
    assert_eq!(rows, 8);

    let selected = NamedTempFile::new().unwrap();
    io::write_points(File::create(selected.path()).unwrap(), &outcome.selected).unwrap();
    let back = io::read_points(File::open(selected.path()).unwrap()).unwrap();
    assert_eq!(back, outcome.selected);
}

#[test]
fn test_target_at_least_pool_returns_pool() {
    let pool: Vec<Point> = (0..10).map(|i| Point::new(0.0, i as f64 * 0.01)).collect();
    let outcome = FarthestPointSampler::new(10).with_seed(99).sample(&pool).unwrap();
    assert_eq!(outcome.selected, pool);
    assert_eq!(outcome.evaluations, 0);
    assert!(outcome.separations.is_empty());
}
