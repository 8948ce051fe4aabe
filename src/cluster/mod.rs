//! Distance-threshold clustering of geographic point rounds.
//!
//! ## Threshold connectivity
//!
//! Two points are *adjacent* when their geodesic distance is at most the
//! threshold (200 m by default). A *cluster* is a connected component of that
//! adjacency graph: every point belongs to exactly one cluster, and points in
//! the same cluster are linked through a chain of adjacent points.
//!
//! ## Rounds
//!
//! Input arrives as independent, fixed-size *rounds*. [`RoundAnalyzer`]
//! clusters each round, labels it by its largest cluster, and aggregates the
//! labels across rounds. Rounds of the wrong size are skipped and reported,
//! never fatal.
//!
//! ## Usage
//!
//! ```rust
//! use geocluster::cluster::{AnalyzerConfig, Round, RoundAnalyzer};
//! use geocluster::Point;
//!
//! let round = Round::new(
//!     1,
//!     vec![
//!         Point::new(0.0, 0.0),
//!         Point::new(0.0, 0.001), // ~111 m east
//!         Point::new(1.0, 1.0),
//!     ],
//! );
//!
//! let analyzer = RoundAnalyzer::new(AnalyzerConfig::default().with_round_size(3));
//! let report = analyzer.analyze(&[round]).unwrap();
//!
//! let result = &report.results[0];
//! assert_eq!(result.clusters, vec![vec![0, 1], vec![2]]);
//! assert_eq!(result.label(), 2);
//! assert_eq!(result.near_pair_count, 1);
//! ```

mod components;
mod graph;
mod rounds;
mod traits;

pub use components::{connected_components, largest_component_size, ThresholdClustering};
pub use graph::{Adjacency, DistanceMatrix, DEFAULT_THRESHOLD_M};
pub use rounds::{
    describe_label, group_rounds, AnalyzerConfig, BatchReport, LabelDistribution, PairDistance,
    Round, RoundAnalyzer, RoundId, RoundResult, SkippedRound, DEFAULT_ROUND_SIZE,
};
pub use traits::Clustering;
