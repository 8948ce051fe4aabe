//! Spatial subsampling of large point pools.
//!
//! [`FarthestPointSampler`] reduces a pool of candidate points to a smaller,
//! evenly spread subset. [`DistanceSummary`] and [`DistanceBands`] describe how
//! spread out the result is.
//!
//! ## Usage
//!
//! ```rust
//! use geocluster::sample::{pairwise_distances, DistanceSummary, FarthestPointSampler};
//! use geocluster::Point;
//!
//! let pool: Vec<Point> = (0..20)
//!     .map(|i| Point::new(40.0 + i as f64 * 0.001, -74.0))
//!     .collect();
//!
//! let out = FarthestPointSampler::new(3).with_seed(42).sample(&pool).unwrap();
//! assert_eq!(out.len(), 3);
//!
//! let summary = DistanceSummary::from_distances(&pairwise_distances(&out.selected).unwrap());
//! assert!(summary.is_some());
//! ```

mod farthest;
mod stats;

pub use farthest::{FarthestPointSampler, SampleOutcome};
pub use stats::{pairwise_distances, BandCount, DistanceBands, DistanceSummary, DEFAULT_BAND_EDGES};
