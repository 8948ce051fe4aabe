//! Distance-distribution statistics over a point set.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geodesic::{distance_unchecked, Point};

/// Default band edges in meters: close (<100), medium (100–500), far (≥500).
pub const DEFAULT_BAND_EDGES: [f64; 2] = [100.0, 500.0];

/// Geodesic distances of every unordered pair `(i, j)`, `i < j`, in
/// lexicographic order.
pub fn pairwise_distances(points: &[Point]) -> Result<Vec<f64>> {
    for p in points {
        p.validate()?;
    }
    let n = points.len();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(distance_unchecked(&points[i], &points[j]));
        }
    }
    Ok(out)
}

/// Summary statistics of a set of distances, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceSummary {
    /// Number of distances.
    pub count: usize,
    /// Smallest distance.
    pub min: f64,
    /// Largest distance.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (mean of the middle two for an even count).
    pub median: f64,
}

impl DistanceSummary {
    /// Summarize `distances`. Returns `None` when there are none.
    pub fn from_distances(distances: &[f64]) -> Option<Self> {
        if distances.is_empty() {
            return None;
        }
        let mut sorted = distances.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sorted.iter().sum::<f64>() / count as f64,
            median,
        })
    }
}

/// Number of distances falling in one band `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandCount {
    /// Inclusive lower bound in meters.
    pub lower: f64,
    /// Exclusive upper bound in meters; `None` for the open-ended last band.
    pub upper: Option<f64>,
    /// Number of distances in the band.
    pub count: usize,
}

impl BandCount {
    /// Short label such as `<100m`, `100-500m` or `>=500m`.
    pub fn label(&self) -> String {
        match self.upper {
            Some(upper) if self.lower == 0.0 => format!("<{upper}m"),
            Some(upper) => format!("{}-{upper}m", self.lower),
            None => format!(">={}m", self.lower),
        }
    }
}

/// Caller-defined distance bands.
///
/// Edges `e0 < e1 < … < ek` define the bands `[0, e0)`, `[e0, e1)`, …,
/// `[ek, ∞)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceBands {
    edges: Vec<f64>,
}

impl DistanceBands {
    /// Create bands from strictly increasing, positive, finite edges.
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        if edges.iter().any(|e| !e.is_finite() || *e <= 0.0) {
            return Err(Error::InvalidParameter {
                name: "bands",
                message: "edges must be positive and finite".to_string(),
            });
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidParameter {
                name: "bands",
                message: "edges must be strictly increasing".to_string(),
            });
        }
        Ok(Self { edges })
    }

    /// Band edges in meters.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Count `distances` per band, in band order.
    pub fn count(&self, distances: &[f64]) -> Vec<BandCount> {
        let mut bands: Vec<BandCount> = Vec::with_capacity(self.edges.len() + 1);
        let mut lower = 0.0;
        for &edge in &self.edges {
            bands.push(BandCount {
                lower,
                upper: Some(edge),
                count: 0,
            });
            lower = edge;
        }
        bands.push(BandCount {
            lower,
            upper: None,
            count: 0,
        });

        for &d in distances {
            // First edge strictly greater than d.
            let slot = self.edges.partition_point(|&e| e <= d);
            bands[slot].count += 1;
        }
        bands
    }
}

impl Default for DistanceBands {
    fn default() -> Self {
        Self {
            edges: DEFAULT_BAND_EDGES.to_vec(),
        }
    }
}
