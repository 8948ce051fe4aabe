use thiserror::Error;

use crate::cluster::RoundId;

/// Errors returned by the analysis and sampling routines in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Latitude or longitude outside its valid range (or not finite).
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Offending latitude in degrees.
        latitude: f64,
        /// Offending longitude in degrees.
        longitude: f64,
    },

    /// A round does not hold the expected number of points.
    #[error("round {round_id} is incomplete: expected {expected} points, found {found}")]
    IncompleteRound {
        /// Identifier of the round.
        round_id: RoundId,
        /// Configured round size.
        expected: usize,
        /// Number of points actually present.
        found: usize,
    },

    /// Configuration rejected before any work starts.
    #[error("degenerate configuration {name}: {message}")]
    DegenerateConfiguration {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Invalid argument value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// Underlying CSV reader/writer failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A CSV field could not be interpreted.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number in the input.
        line: u64,
        /// Human-readable explanation.
        message: String,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
