//! Clustering algorithms for grouping numeric points.
//!
//! This module provides k-means clustering of dense `f64` vectors and an
//! x-means layer that discovers the number of clusters.
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat until no point
//! switches centroid.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical under the chosen measure
//! - You know k in advance
//!
//! The assignment step runs on a worker pool: one job per point on a
//! bounded queue, a fixed pool computing nearest centroids, and an
//! aggregator folding results back into the assignment table. See
//! [`Kmeans`].
//!
//! ### X-means
//!
//! When k is unknown, x-means searches for it: starting from one cluster,
//! it recursively bisects clusters with local k-means (k=2) runs and keeps
//! each split only if the Bayesian Information Criterion improves. See
//! [`XMeans`].
//!
//! ## Strategy injection
//!
//! The distance measure ([`SquaredEuclidean`], [`Manhattan`]) and the
//! initial-centroid strategy ([`RandomCentroids`], [`PointCentroids`],
//! [`EllipseCentroids`]) are explicit arguments to [`Kmeans::fit`] and
//! [`XMeans::fit`]. The same measure threads through assignment and the
//! BIC statistics, so one run is consistent end to end.
//!
//! ## Usage
//!
//! ```rust
//! use xmeans::cluster::{Clustering, Kmeans, XMeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! // Hard clustering with a known k
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//!
//! // Let BIC pick the number of clusters
//! let labels = XMeans::new().with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels.len(), data.len());
//! ```

mod assign;
mod distance;
mod init;
mod kmeans;
mod stats;
mod traits;
mod xmeans;

pub use assign::{nearest_centroid, Assignment};
pub use distance::{Distance, Manhattan, SquaredEuclidean};
pub use init::{CentroidChooser, EllipseCentroids, PointCentroids, RandomCentroids};
pub use kmeans::{compute_centroid, Kmeans, KmeansFit};
pub use stats::{bic, free_params, log_likelihood, point_prob, variance, Cluster, Model};
pub use traits::Clustering;
pub use xmeans::XMeans;
