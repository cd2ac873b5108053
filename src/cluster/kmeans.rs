//! K-means refinement (Lloyd iterations).
//!
//! Partitions data into k clusters by minimizing within-cluster sum of
//! squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! # The Loop
//!
//! 1. Obtain initial centroids from the injected [`CentroidChooser`]
//! 2. **Assign**: every point → nearest centroid (parallel engine)
//! 3. **Update**: every centroid → mean of its members; a centroid with no
//!    members keeps its previous position
//! 4. Repeat until no point switches centroid, or `max_iter` is reached
//!
//! The iteration bound exists for degenerate oscillation only; on real
//! data the no-change test is what stops the loop.
//!
//! # Assumptions
//!
//! - Clusters are roughly spherical under the chosen measure
//! - You know k in advance (see [`XMeans`](super::XMeans) when you don't)

use log::debug;
use rand::prelude::*;

use super::assign::{assign_all, Assignment};
use super::distance::{Distance, SquaredEuclidean};
use super::init::{CentroidChooser, RandomCentroids};
use super::traits::Clustering;
use crate::error::{Error, Result};

/// Coordinate-wise mean of a set of points.
///
/// Fails with [`Error::EmptyInput`] on zero rows and
/// [`Error::DimensionMismatch`] on ragged rows.
pub fn compute_centroid(points: &[Vec<f64>]) -> Result<Vec<f64>> {
    if points.is_empty() {
        return Err(Error::EmptyInput);
    }

    let d = points[0].len();
    let mut sums = vec![0.0; d];
    for point in points {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
        for (acc, &x) in sums.iter_mut().zip(point.iter()) {
            *acc += x;
        }
    }

    let n = points.len() as f64;
    for acc in &mut sums {
        *acc /= n;
    }
    Ok(sums)
}

/// Mean of the rows of `data` selected by `members`.
pub(crate) fn centroid_of_members(data: &[Vec<f64>], members: &[usize]) -> Result<Vec<f64>> {
    if members.is_empty() {
        return Err(Error::EmptyInput);
    }

    let d = data[members[0]].len();
    let mut sums = vec![0.0; d];
    for &row in members {
        let point = &data[row];
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
        for (acc, &x) in sums.iter_mut().zip(point.iter()) {
            *acc += x;
        }
    }

    let n = members.len() as f64;
    for acc in &mut sums {
        *acc /= n;
    }
    Ok(sums)
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

pub(crate) fn check_fit_args(data: &[Vec<f64>], k: usize) -> Result<()> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            message: "must be at least 1",
        });
    }
    if k > data.len() {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: data.len(),
        });
    }
    let d = data[0].len();
    for point in data.iter().skip(1) {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
    }
    Ok(())
}

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum refinement iterations.
    max_iter: usize,
    /// Worker threads for the assignment engine (defaults to the machine's
    /// available parallelism).
    workers: Option<usize>,
    /// Random seed.
    seed: Option<u64>,
}

/// The converged output of [`Kmeans::fit`].
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Final centroid matrix, one row per cluster.
    pub centroids: Vec<Vec<f64>>,
    /// Final assignment table, one row per input point.
    pub assignments: Vec<Assignment>,
}

impl KmeansFit {
    /// One cluster label per input point.
    pub fn labels(&self) -> Vec<usize> {
        self.assignments.iter().map(|a| a.centroid).collect()
    }
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            workers: None,
            seed: None,
        }
    }

    /// Set maximum refinement iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the assignment engine's worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the refinement loop with an injected chooser and measure.
    pub fn fit(
        &self,
        data: &[Vec<f64>],
        chooser: &dyn CentroidChooser,
        measure: &dyn Distance,
    ) -> Result<KmeansFit> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(data, chooser, measure, rng.as_mut())
    }

    /// The refinement loop proper, driven by a caller-owned RNG so the
    /// model selector can run many bisections off one seed.
    pub(crate) fn fit_with_rng(
        &self,
        data: &[Vec<f64>],
        chooser: &dyn CentroidChooser,
        measure: &dyn Distance,
        rng: &mut dyn RngCore,
    ) -> Result<KmeansFit> {
        check_fit_args(data, self.k)?;
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        let n = data.len();
        let workers = self.workers.unwrap_or_else(default_workers);

        let mut centroids = chooser.choose(data, self.k, rng)?;
        let mut table = vec![Assignment::unset(); n];
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); self.k];

        for iter in 0..self.max_iter {
            let changed = assign_all(data, &centroids, measure, &mut table, workers)?;
            if !changed {
                debug!("k-means converged after {} iterations (k={})", iter, self.k);
                return Ok(KmeansFit {
                    centroids,
                    assignments: table,
                });
            }

            for m in &mut members {
                m.clear();
            }
            for (row, a) in table.iter().enumerate() {
                members[a.centroid].push(row);
            }

            for (c, rows) in members.iter().enumerate() {
                // A centroid that lost all its members keeps its previous
                // position; the mean of zero points is an error, not a
                // centroid.
                if rows.is_empty() {
                    continue;
                }
                centroids[c] = centroid_of_members(data, rows)?;
            }
        }

        debug!(
            "k-means stopped at the iteration bound ({}) without converging (k={})",
            self.max_iter, self.k
        );
        Ok(KmeansFit {
            centroids,
            assignments: table,
        })
    }
}

impl Clustering for Kmeans {
    /// Labels from a fit with the default strategies: uniformly sampled
    /// initial centroids and squared Euclidean distance.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        let fit = self.fit(data, &RandomCentroids, &SquaredEuclidean)?;
        Ok(fit.labels())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_centroid_single_row() {
        let points = vec![vec![3.5, -1.0, 2.0]];
        let centroid = compute_centroid(&points).unwrap();
        assert_eq!(centroid, vec![3.5, -1.0, 2.0]);
    }

    #[test]
    fn test_compute_centroid_means_rows() {
        let points = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        assert_eq!(compute_centroid(&points).unwrap(), vec![1.0, 1.0]);

        let points = vec![vec![3.0, 1.0], vec![1.0, 1.0]];
        assert_eq!(compute_centroid(&points).unwrap(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_compute_centroid_empty_fails() {
        let points: Vec<Vec<f64>> = vec![];
        assert!(matches!(
            compute_centroid(&points),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_kmeans_basic() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ];

        let kmeans = Kmeans::new(2).with_seed(42);
        let labels = kmeans.fit_predict(&data).unwrap();

        // Points 0,1 together, points 2,3 together, groups apart.
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_kmeans_fit_shapes() {
        let data: Vec<Vec<f64>> = (0..50)
            .map(|i| vec![i as f64 * 0.1, (i % 5) as f64, (i % 3) as f64])
            .collect();

        let fit = Kmeans::new(5)
            .with_seed(123)
            .fit(&data, &RandomCentroids, &SquaredEuclidean)
            .unwrap();

        assert_eq!(fit.centroids.len(), 5);
        for c in &fit.centroids {
            assert_eq!(c.len(), 3);
        }
        assert_eq!(fit.assignments.len(), data.len());
        for a in &fit.assignments {
            assert!(a.centroid < 5);
            assert!(a.distance >= 0.0);
        }
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let data: Vec<Vec<f64>> = (0..30)
            .map(|i| vec![(i % 7) as f64, (i % 11) as f64])
            .collect();

        let labels1 = Kmeans::new(3).with_seed(42).fit_predict(&data).unwrap();
        let labels2 = Kmeans::new(3).with_seed(42).fit_predict(&data).unwrap();

        assert_eq!(labels1, labels2, "same seed should give same result");
    }

    #[test]
    fn test_kmeans_manhattan_measure() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.5, 0.0],
            vec![20.0, 20.0],
            vec![20.0, 20.5],
        ];

        let fit = Kmeans::new(2)
            .with_seed(9)
            .fit(&data, &RandomCentroids, &super::super::distance::Manhattan)
            .unwrap();
        let labels = fit.labels();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_kmeans_empty_cluster_keeps_centroid() {
        // A chooser that plants one centroid far away from all data, so
        // that cluster never gains a member.
        struct FarAway;
        impl CentroidChooser for FarAway {
            fn choose(
                &self,
                _data: &[Vec<f64>],
                k: usize,
                _rng: &mut dyn RngCore,
            ) -> Result<Vec<Vec<f64>>> {
                assert_eq!(k, 2);
                Ok(vec![vec![0.0, 0.0], vec![1000.0, 1000.0]])
            }
        }

        let data = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        let fit = Kmeans::new(2)
            .fit(&data, &FarAway, &SquaredEuclidean)
            .unwrap();

        // The empty cluster's centroid is exactly where the chooser left it.
        assert_eq!(fit.centroids[1], vec![1000.0, 1000.0]);
        for a in &fit.assignments {
            assert_eq!(a.centroid, 0);
        }
    }

    #[test]
    fn test_kmeans_k_equals_n() {
        let data = vec![vec![0.0, 0.0], vec![5.0, 0.0], vec![0.0, 5.0]];

        let labels = Kmeans::new(3).with_seed(42).fit_predict(&data).unwrap();

        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_kmeans_empty_input_error() {
        let data: Vec<Vec<f64>> = vec![];
        assert!(Kmeans::new(2).fit_predict(&data).is_err());
    }

    #[test]
    fn test_kmeans_k_zero_error() {
        let data = vec![vec![0.0, 0.0]];
        assert!(matches!(
            Kmeans::new(0).fit_predict(&data),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_kmeans_k_larger_than_n_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        assert!(matches!(
            Kmeans::new(5).fit_predict(&data),
            Err(Error::InvalidClusterCount { .. })
        ));
    }

    #[test]
    fn test_kmeans_ragged_rows_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0]];
        assert!(matches!(
            Kmeans::new(1).fit_predict(&data),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
