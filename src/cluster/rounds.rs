//! Per-round analysis and cross-round aggregation.
//!
//! Each round is an independent, fixed-size batch of points. A round is
//! labelled by the size of its largest threshold-connected cluster:
//!
//! - label `1`: no two points are linked, even transitively
//! - label `N`: the whole round is one cluster
//!
//! Alongside the label, each result records `near_pair_count`, the number of
//! unordered pairs that are *directly* within the threshold. The two numbers
//! measure different things and are kept separate: a chain `0–1–2` with
//! `0` and `2` out of range has label 3 but only 2 near pairs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::components::{connected_components, largest_component_size, ThresholdClustering};
use super::graph::{DistanceMatrix, DEFAULT_THRESHOLD_M};
use crate::error::{Error, Result};
use crate::geodesic::Point;

/// Identifier of a round.
pub type RoundId = u64;

/// Default number of points per round.
pub const DEFAULT_ROUND_SIZE: usize = 5;

/// An independent batch of points sharing one identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Round identifier.
    pub id: RoundId,
    /// Points in input order.
    pub points: Vec<Point>,
}

impl Round {
    /// Create a round.
    pub fn new(id: RoundId, points: Vec<Point>) -> Self {
        Self { id, points }
    }
}

/// Group flat `(round id, point)` records into rounds.
///
/// Rounds come out in the order their id first appears, not sorted by id, so
/// reports follow the input file; points keep their relative input order
/// within a round.
pub fn group_rounds<I>(records: I) -> Vec<Round>
where
    I: IntoIterator<Item = (RoundId, Point)>,
{
    let mut rounds: Vec<Round> = Vec::new();
    let mut slot: HashMap<RoundId, usize> = HashMap::new();
    for (id, point) in records {
        let idx = *slot.entry(id).or_insert_with(|| {
            rounds.push(Round::new(id, Vec::new()));
            rounds.len() - 1
        });
        rounds[idx].points.push(point);
    }
    rounds
}

/// Distance between one unordered pair of points in a round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairDistance {
    /// Index of the first point.
    pub first: usize,
    /// Index of the second point (`first < second`).
    pub second: usize,
    /// Geodesic distance in meters.
    pub distance_m: f64,
    /// Whether `distance_m <= threshold`.
    pub within_threshold: bool,
}

/// Analysis of a single round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round identifier.
    pub round_id: RoundId,
    /// The analyzed points; cluster and pair indices refer to this list.
    pub points: Vec<Point>,
    /// Clusters in ascending order of their smallest index.
    pub clusters: Vec<Vec<usize>>,
    /// Size of the largest cluster (the round's label).
    pub largest_cluster_size: usize,
    /// Number of pairs directly within the threshold.
    pub near_pair_count: usize,
    /// Every unordered pair, `(0,1), (0,2), …` order.
    pub pairs: Vec<PairDistance>,
}

impl RoundResult {
    /// The round's label: the size of its largest cluster.
    pub fn label(&self) -> usize {
        self.largest_cluster_size
    }

    /// Number of clusters.
    pub fn total_groups(&self) -> usize {
        self.clusters.len()
    }
}

/// A round excluded from a batch.
#[derive(Debug)]
pub struct SkippedRound {
    /// Round identifier.
    pub round_id: RoundId,
    /// Why the round was excluded.
    pub reason: Error,
}

/// Frequency of each label across analyzed rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDistribution {
    counts: BTreeMap<usize, usize>,
    total: usize,
}

impl LabelDistribution {
    /// Tally the labels of `results`.
    pub fn from_results(results: &[RoundResult]) -> Self {
        let mut dist = Self::default();
        for r in results {
            *dist.counts.entry(r.label()).or_insert(0) += 1;
            dist.total += 1;
        }
        dist
    }

    /// Number of rounds tallied.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of rounds with `label`.
    pub fn count(&self, label: usize) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Share of rounds with `label`, in percent. Zero when nothing was tallied.
    pub fn percentage(&self, label: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(label) as f64 / self.total as f64 * 100.0
    }

    /// `(label, count)` pairs in ascending label order. Labels with no rounds
    /// are omitted.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(&l, &c)| (l, c))
    }
}

/// Human-readable meaning of a label for reports.
pub fn describe_label(label: usize, round_size: usize, threshold_m: f64) -> String {
    if label <= 1 {
        format!("All {round_size} locations >{threshold_m}m apart")
    } else if label == round_size {
        format!("All {round_size} locations within {threshold_m}m")
    } else {
        format!("Max {label} locations within {threshold_m}m")
    }
}

/// Outcome of analyzing a batch of rounds.
#[derive(Debug)]
pub struct BatchReport {
    /// Results for the rounds that were analyzed, in input order.
    pub results: Vec<RoundResult>,
    /// Rounds excluded from the aggregates, in input order.
    pub skipped: Vec<SkippedRound>,
    /// Label frequencies over `results`.
    pub distribution: LabelDistribution,
}

impl BatchReport {
    /// Number of rounds analyzed.
    pub fn processed(&self) -> usize {
        self.results.len()
    }

    /// Number of rounds skipped.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Round analysis parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    /// Adjacency threshold in meters.
    pub threshold_m: f64,
    /// Expected number of points in every round.
    pub round_size: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            threshold_m: DEFAULT_THRESHOLD_M,
            round_size: DEFAULT_ROUND_SIZE,
        }
    }
}

impl AnalyzerConfig {
    /// Set the threshold in meters.
    pub fn with_threshold(mut self, threshold_m: f64) -> Self {
        self.threshold_m = threshold_m;
        self
    }

    /// Set the expected round size.
    pub fn with_round_size(mut self, round_size: usize) -> Self {
        self.round_size = round_size;
        self
    }

    /// Reject configurations no round could be analyzed under.
    pub fn validate(&self) -> Result<()> {
        ThresholdClustering::check_threshold(self.threshold_m)?;
        if self.round_size == 0 {
            return Err(Error::DegenerateConfiguration {
                name: "round_size",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Clusters rounds and aggregates their labels.
#[derive(Debug, Clone, Default)]
pub struct RoundAnalyzer {
    config: AnalyzerConfig,
}

impl RoundAnalyzer {
    /// Create an analyzer.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// The analyzer's configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one round.
    ///
    /// Fails with [`Error::IncompleteRound`] when the round does not hold
    /// exactly `round_size` points and with [`Error::InvalidCoordinate`] when a
    /// point is out of range.
    pub fn analyze_round(&self, round: &Round) -> Result<RoundResult> {
        self.config.validate()?;

        if round.points.len() != self.config.round_size {
            return Err(Error::IncompleteRound {
                round_id: round.id,
                expected: self.config.round_size,
                found: round.points.len(),
            });
        }

        let threshold = self.config.threshold_m;
        let matrix = DistanceMatrix::build(&round.points)?;
        let clusters = connected_components(&matrix.adjacency(threshold));

        let pairs: Vec<PairDistance> = matrix
            .pairs()
            .map(|(first, second, distance_m)| PairDistance {
                first,
                second,
                distance_m,
                within_threshold: distance_m <= threshold,
            })
            .collect();
        let near_pair_count = pairs.iter().filter(|p| p.within_threshold).count();

        Ok(RoundResult {
            round_id: round.id,
            points: round.points.clone(),
            largest_cluster_size: largest_component_size(&clusters),
            clusters,
            near_pair_count,
            pairs,
        })
    }

    /// Analyze every round and aggregate the labels.
    ///
    /// A degenerate configuration fails the whole call before any round is
    /// touched. Rounds that fail individually are logged, collected in
    /// [`BatchReport::skipped`] and left out of the distribution.
    pub fn analyze(&self, rounds: &[Round]) -> Result<BatchReport> {
        self.config.validate()?;

        let mut results = Vec::with_capacity(rounds.len());
        let mut skipped = Vec::new();

        for round in rounds {
            match self.analyze_round(round) {
                Ok(result) => {
                    debug!(
                        round_id = round.id,
                        label = result.label(),
                        groups = result.total_groups(),
                        near_pairs = result.near_pair_count,
                        "analyzed round"
                    );
                    results.push(result);
                }
                Err(reason @ (Error::IncompleteRound { .. } | Error::InvalidCoordinate { .. })) => {
                    warn!(round_id = round.id, %reason, "skipping round");
                    skipped.push(SkippedRound {
                        round_id: round.id,
                        reason,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let distribution = LabelDistribution::from_results(&results);
        info!(
            processed = results.len(),
            skipped = skipped.len(),
            "round analysis complete"
        );

        Ok(BatchReport {
            results,
            skipped,
            distribution,
        })
    }
}
