//! Pairwise distance matrix and threshold adjacency for one round.

use crate::error::Result;
use crate::geodesic::{distance_unchecked, Point};

/// Default adjacency threshold in meters.
pub const DEFAULT_THRESHOLD_M: f64 = 200.0;

/// Symmetric N×N matrix of geodesic distances in meters.
///
/// Stored row-major. The diagonal is zero. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix for `points`.
    ///
    /// Only the upper triangle is evaluated (`n * (n - 1) / 2` distance calls);
    /// each value is mirrored to its transpose. Fails if any point is out of
    /// range.
    pub fn build(points: &[Point]) -> Result<Self> {
        for p in points {
            p.validate()?;
        }

        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = distance_unchecked(&points[i], &points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        Ok(Self { n, data })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix covers zero points.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between points `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index out of bounds");
        self.data[i * self.n + j]
    }

    /// Iterate over unordered pairs `(i, j, distance)` with `i < j`, in
    /// lexicographic order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.n).flat_map(move |i| ((i + 1)..self.n).map(move |j| (i, j, self.get(i, j))))
    }

    /// Derive the adjacency under `threshold`: an edge exists iff
    /// `distance <= threshold`. There are no self-loops.
    pub fn adjacency(&self, threshold: f64) -> Adjacency {
        let n = self.n;
        let mut edges = vec![false; n * n];
        for (i, j, d) in self.pairs() {
            if d <= threshold {
                edges[i * n + j] = true;
                edges[j * n + i] = true;
            }
        }
        Adjacency { n, edges }
    }
}

/// Boolean adjacency matrix derived from a [`DistanceMatrix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    n: usize,
    edges: Vec<bool>,
}

impl Adjacency {
    /// Build directly from an edge list. Edges are treated as undirected;
    /// self-loops are ignored.
    ///
    /// # Panics
    ///
    /// Panics if an edge endpoint is `>= n`.
    pub fn from_edges(n: usize, edge_list: &[(usize, usize)]) -> Self {
        let mut edges = vec![false; n * n];
        for &(i, j) in edge_list {
            assert!(i < n && j < n, "edge endpoint out of bounds");
            if i != j {
                edges[i * n + j] = true;
                edges[j * n + i] = true;
            }
        }
        Self { n, edges }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Whether `i` and `j` are directly connected.
    #[inline]
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.edges[i * self.n + j]
    }

    /// Direct neighbors of `i`, ascending.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        let row = &self.edges[i * self.n..(i + 1) * self.n];
        row.iter()
            .enumerate()
            .filter_map(|(j, &e)| if e { Some(j) } else { None })
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|&&e| e).count() / 2
    }
}
