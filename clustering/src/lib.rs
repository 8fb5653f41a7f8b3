mod error;
mod kmeans;

pub use error::{ClusteringErr, Result};
pub use kmeans::{DEFAULT_CLUSTERS, KMeans, MAX_CLUSTERS, MIN_CLUSTERS, Point};
