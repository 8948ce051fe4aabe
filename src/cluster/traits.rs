use crate::error::Result;
use crate::geodesic::Point;

/// Common interface for hard clustering of geographic points (one label per point).
pub trait Clustering {
    /// Cluster the points and return one cluster label per input point.
    fn fit_predict(&self, points: &[Point]) -> Result<Vec<usize>>;

    /// The configured number of clusters (if applicable).
    ///
    /// For algorithms that discover the number of clusters from the data,
    /// this returns 0.
    fn n_clusters(&self) -> usize;
}
