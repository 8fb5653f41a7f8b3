use log::debug;

use crate::error::{ClusteringErr, Result};

pub const MIN_CLUSTERS: usize = 2;
pub const MAX_CLUSTERS: usize = 10;
pub const DEFAULT_CLUSTERS: usize = 2;

/// A sample position on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Iterative k-means engine, one Lloyd iteration per `iterate` call.
///
/// Labels are 1-based cluster indices in `1..=k`. Before the first
/// iteration the point set is open for additions; the first effective
/// iteration freezes both the points and `k` until `reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    k: usize,
    points: Vec<Point>,
    labels: Vec<usize>,
    centroids: Vec<Point>,
    started: bool,
}

impl KMeans {
    /// Creates an engine for `k` clusters with no points.
    ///
    /// # Errors
    /// Fails when `k` is outside `2..=10`.
    pub fn new(k: usize) -> Result<Self> {
        if !(MIN_CLUSTERS..=MAX_CLUSTERS).contains(&k) {
            return Err(ClusteringErr::ClusterCountOutOfRange { got: k });
        }

        Ok(Self {
            k,
            points: Vec::new(),
            labels: Vec::new(),
            centroids: Vec::new(),
            started: false,
        })
    }

    /// Adds a point with its initial cluster label.
    ///
    /// # Errors
    /// Rejected once clustering has started, and when `label` is outside
    /// `1..=k`.
    pub fn add_point(&mut self, x: f32, y: f32, label: usize) -> Result<()> {
        if self.started {
            return Err(ClusteringErr::Started);
        }
        if label == 0 || label > self.k {
            return Err(ClusteringErr::LabelOutOfRange { got: label, k: self.k });
        }

        self.points.push(Point::new(x, y));
        self.labels.push(label);
        Ok(())
    }

    /// Runs one Lloyd iteration: recompute centroids, then reassign labels.
    ///
    /// Returns true when no label changed, i.e. the clustering converged.
    /// With no points this is a no-op returning false, and the point set
    /// stays open.
    pub fn iterate(&mut self) -> bool {
        if self.points.is_empty() {
            return false;
        }
        self.started = true;

        let mut centroids = Vec::with_capacity(self.k);
        for cluster in 1..=self.k {
            let mut sum = Point::default();
            let mut count = 0usize;
            for (point, &label) in self.points.iter().zip(&self.labels) {
                if label != cluster {
                    continue;
                }
                sum.x += point.x;
                sum.y += point.y;
                count += 1;
            }

            // An abandoned cluster collapses to the origin.
            if count == 0 {
                centroids.push(Point::default());
            } else {
                centroids.push(Point::new(sum.x / count as f32, sum.y / count as f32));
            }
        }

        let labels: Vec<usize> = self
            .points
            .iter()
            .map(|point| {
                let mut best = 0;
                let mut best_distance = f32::INFINITY;
                for (idx, &centroid) in centroids.iter().enumerate() {
                    let distance = point.distance(centroid);
                    // Ties go to the later centroid.
                    if distance <= best_distance {
                        best_distance = distance;
                        best = idx + 1;
                    }
                }
                best
            })
            .collect();

        let converged = labels == self.labels;
        debug!(converged = converged; "lloyd iteration finished");

        self.centroids = centroids;
        self.labels = labels;
        converged
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Cluster index per point, parallel to `points`.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// One centroid per cluster after the latest iteration; empty before
    /// the first.
    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Returns to the initial state: no points, default cluster count, the
    /// point set open again.
    pub fn reset(&mut self) {
        self.k = DEFAULT_CLUSTERS;
        self.points.clear();
        self.labels.clear();
        self.centroids.clear();
        self.started = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_count_is_validated() {
        assert!(KMeans::new(2).is_ok());
        assert!(KMeans::new(10).is_ok());
        assert_eq!(
            KMeans::new(1).unwrap_err(),
            ClusteringErr::ClusterCountOutOfRange { got: 1 }
        );
        assert_eq!(
            KMeans::new(11).unwrap_err(),
            ClusteringErr::ClusterCountOutOfRange { got: 11 }
        );
    }

    #[test]
    fn labels_are_validated_against_k() {
        let mut kmeans = KMeans::new(2).unwrap();
        assert!(kmeans.add_point(0.0, 0.0, 1).is_ok());
        assert!(kmeans.add_point(0.0, 0.0, 2).is_ok());
        assert_eq!(
            kmeans.add_point(0.0, 0.0, 0).unwrap_err(),
            ClusteringErr::LabelOutOfRange { got: 0, k: 2 }
        );
        assert_eq!(
            kmeans.add_point(0.0, 0.0, 3).unwrap_err(),
            ClusteringErr::LabelOutOfRange { got: 3, k: 2 }
        );
    }

    #[test]
    fn separated_pair_converges_in_one_iteration() {
        let mut kmeans = KMeans::new(2).unwrap();
        kmeans.add_point(0.0, 0.0, 1).unwrap();
        kmeans.add_point(10.0, 10.0, 2).unwrap();

        assert!(kmeans.iterate());
        assert_eq!(kmeans.centroids(), [Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        assert_eq!(kmeans.labels(), [1, 2]);
    }

    #[test]
    fn exact_ties_go_to_the_higher_cluster() {
        // Centroids land on (2, 0) and (6, 0); the middle point at (4, 0)
        // is exactly equidistant and must flip to cluster 2.
        let mut kmeans = KMeans::new(2).unwrap();
        kmeans.add_point(0.0, 0.0, 1).unwrap();
        kmeans.add_point(4.0, 0.0, 1).unwrap();
        kmeans.add_point(6.0, 0.0, 2).unwrap();

        let converged = kmeans.iterate();

        assert!(!converged);
        assert_eq!(kmeans.labels(), [1, 2, 2]);
    }

    #[test]
    fn abandoned_clusters_collapse_to_the_origin() {
        let mut kmeans = KMeans::new(2).unwrap();
        kmeans.add_point(2.0, 2.0, 1).unwrap();
        kmeans.add_point(4.0, 4.0, 1).unwrap();

        assert!(kmeans.iterate());
        assert_eq!(kmeans.centroids(), [Point::new(3.0, 3.0), Point::new(0.0, 0.0)]);
        assert_eq!(kmeans.labels(), [1, 1]);
    }

    #[test]
    fn the_first_iteration_freezes_the_point_set() {
        let mut kmeans = KMeans::new(2).unwrap();
        kmeans.add_point(0.0, 0.0, 1).unwrap();
        kmeans.add_point(10.0, 10.0, 2).unwrap();
        kmeans.iterate();

        assert!(kmeans.is_started());
        assert_eq!(
            kmeans.add_point(5.0, 5.0, 1).unwrap_err(),
            ClusteringErr::Started
        );
    }

    #[test]
    fn iterating_an_empty_engine_is_a_no_op() {
        let mut kmeans = KMeans::new(3).unwrap();

        assert!(!kmeans.iterate());
        assert!(!kmeans.is_started());
        assert!(kmeans.centroids().is_empty());

        // The set is still open.
        assert!(kmeans.add_point(1.0, 1.0, 1).is_ok());
    }

    #[test]
    fn reset_reopens_the_engine_with_defaults() {
        let mut kmeans = KMeans::new(5).unwrap();
        kmeans.add_point(1.0, 1.0, 4).unwrap();
        kmeans.iterate();

        kmeans.reset();
        assert_eq!(kmeans.k(), DEFAULT_CLUSTERS);
        assert!(kmeans.points().is_empty());
        assert!(kmeans.labels().is_empty());
        assert!(kmeans.centroids().is_empty());
        assert!(!kmeans.is_started());

        kmeans.reset();
        assert_eq!(kmeans.k(), DEFAULT_CLUSTERS);
        assert!(!kmeans.is_started());
    }
}
