//! Threshold connectivity clustering.
//!
//! # The Algorithm
//!
//! Points are nodes; an undirected edge joins two points whose geodesic
//! distance is at most the threshold. Clusters are the connected components of
//! that graph.
//!
//! 1. For each unvisited node `s`, in ascending index order:
//!    - push `s` on a stack, mark it visited
//!    - pop nodes, pushing every unvisited neighbor
//!    - everything popped forms one cluster
//!
//! Clustering is *transitive*: two points in the same cluster need not be
//! within threshold of each other, only linked through intermediate points.
//! This is single-linkage clustering cut at the threshold, or DBSCAN with
//! `min_pts = 1` (no noise).
//!
//! ## Complexity
//!
//! - **Time**: O(n²) for the dense adjacency scan.
//! - **Space**: O(n²) for the adjacency, O(n) for the traversal.

use super::graph::{Adjacency, DistanceMatrix, DEFAULT_THRESHOLD_M};
use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::geodesic::Point;

/// Partition the nodes of `adjacency` into connected components.
///
/// Components are returned in ascending order of their smallest node, and the
/// nodes inside each component are sorted ascending, so the output is fully
/// determined by the graph.
pub fn connected_components(adjacency: &Adjacency) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut visited = vec![false; n];
    let mut components = Vec::new();

    // Explicit stack: no recursion-depth limit for large rounds.
    let mut stack: Vec<usize> = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        stack.push(start);

        let mut component = Vec::new();
        while let Some(node) = stack.pop() {
            component.push(node);
            for next in adjacency.neighbors(node) {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }

        component.sort_unstable();
        components.push(component);
    }

    components
}

/// Size of the largest component, or 0 when there are none.
pub fn largest_component_size(components: &[Vec<usize>]) -> usize {
    components.iter().map(Vec::len).max().unwrap_or(0)
}

/// Connected-components clustering of geographic points under a distance
/// threshold.
#[derive(Debug, Clone)]
pub struct ThresholdClustering {
    /// Maximum distance in meters for two points to be directly adjacent.
    threshold_m: f64,
}

impl ThresholdClustering {
    /// Create a clusterer with the given threshold in meters.
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }

    /// Configured threshold in meters.
    pub fn threshold(&self) -> f64 {
        self.threshold_m
    }

    pub(crate) fn check_threshold(threshold_m: f64) -> Result<()> {
        if !threshold_m.is_finite() || threshold_m <= 0.0 {
            return Err(Error::DegenerateConfiguration {
                name: "threshold",
                message: "must be positive and finite",
            });
        }
        Ok(())
    }

    /// Cluster `points`, returning the components as index sets.
    pub fn components(&self, points: &[Point]) -> Result<Vec<Vec<usize>>> {
        Self::check_threshold(self.threshold_m)?;
        let matrix = DistanceMatrix::build(points)?;
        Ok(connected_components(&matrix.adjacency(self.threshold_m)))
    }
}

impl Default for ThresholdClustering {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_M)
    }
}

impl Clustering for ThresholdClustering {
    fn fit_predict(&self, points: &[Point]) -> Result<Vec<usize>> {
        let components = self.components(points)?;
        let mut labels = vec![0; points.len()];
        for (cluster_id, component) in components.iter().enumerate() {
            for &i in component {
                labels[i] = cluster_id;
            }
        }
        Ok(labels)
    }

    /// Components are discovered from the data, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}
