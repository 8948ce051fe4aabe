//! Geographic point clustering and spatial sampling.
//!
//! `geocluster` analyzes sets of latitude/longitude points in two ways:
//!
//! - [`cluster`]: partitions independent, fixed-size *rounds* of points into
//!   clusters of points linked by chains of short (≤ threshold) geodesic
//!   hops, and labels each round by its largest cluster
//! - [`sample`]: reduces a large pool of points to an evenly spread subset by
//!   greedy farthest-point selection
//!
//! All distances are ellipsoidal (WGS-84) geodesics in meters; see
//! [`geodesic_distance`]. The [`io`] module reads and writes the CSV tables
//! used by the `geocluster` binary.

#![forbid(unsafe_code)]

pub mod cli;
pub mod cluster;
pub mod error;
pub mod geodesic;
pub mod io;
pub mod sample;

pub use cluster::{
    AnalyzerConfig, BatchReport, Clustering, DistanceMatrix, Round, RoundAnalyzer, RoundResult,
    ThresholdClustering,
};
pub use error::{Error, Result};
pub use geodesic::{geodesic_distance, Point};
pub use sample::{DistanceBands, DistanceSummary, FarthestPointSampler, SampleOutcome};
