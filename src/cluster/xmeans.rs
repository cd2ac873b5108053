//! X-means: k-means with BIC-driven model selection.
//!
//! K-means needs k up front. X-means (Pelleg & Moore, 2000) discovers it:
//! start from a single cluster covering every point, then repeatedly try
//! to bisect each cluster with a local k-means (k=2) and keep the split
//! only when the Bayesian Information Criterion of the two-cluster local
//! model beats the one-cluster local model on the same points.
//!
//! # The Search
//!
//! Each cluster under consideration moves through
//! `Candidate → Bisected → {Accepted, Rejected}`:
//!
//! - **Accepted**: the children replace the parent and are themselves
//!   bisected independently.
//! - **Rejected**: the parent is final; the search never revisits it.
//!
//! The final model is the set of clusters whose bisection was rejected
//! (or that a safety bound froze). Two bounds guarantee termination on
//! degenerate data where splitting always "improves": a maximum cluster
//! count and a maximum bisection depth.
//!
//! A failed bisection — a child with no members, a zero-variance
//! singleton, any statistics error — is an automatic reject, never a
//! fatal error: the rest of the tree is still searched.

use log::{debug, info};
use rand::prelude::*;

use super::distance::{Distance, SquaredEuclidean};
use super::init::{CentroidChooser, RandomCentroids};
use super::kmeans::{centroid_of_members, check_fit_args, Kmeans};
use super::stats::{bic, Cluster, Model};
use super::traits::Clustering;
use crate::error::{Error, Result};

/// X-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct XMeans {
    /// Hard cap on the number of clusters in the final model.
    max_clusters: usize,
    /// Hard cap on bisection depth below the root cluster.
    max_depth: usize,
    /// Iteration bound for each local k-means run.
    max_iter: usize,
    /// Worker threads for the assignment engine.
    workers: Option<usize>,
    /// Random seed.
    seed: Option<u64>,
}

impl XMeans {
    /// Create a new X-means selector with default bounds.
    pub fn new() -> Self {
        Self {
            max_clusters: 16,
            max_depth: 16,
            max_iter: 100,
            workers: None,
            seed: None,
        }
    }

    /// Set the maximum number of clusters in the final model.
    pub fn with_max_clusters(mut self, max_clusters: usize) -> Self {
        self.max_clusters = max_clusters;
        self
    }

    /// Set the maximum bisection depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the iteration bound of each local k-means run.
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

    /// Search for the partition of `data` with the best local BIC scores.
    pub fn fit(
        &self,
        data: &[Vec<f64>],
        chooser: &dyn CentroidChooser,
        measure: &dyn Distance,
    ) -> Result<Model> {
        check_fit_args(data, 1)?;
        if self.max_clusters == 0 {
            return Err(Error::InvalidParameter {
                name: "max_clusters",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let members: Vec<usize> = (0..data.len()).collect();
        let centroid = centroid_of_members(data, &members)?;

        // Explicit work stack instead of recursion; depth rides along with
        // each candidate.
        let mut candidates: Vec<(Cluster, usize)> = vec![(Cluster::new(members, centroid), 0)];
        let mut finished: Vec<Cluster> = Vec::new();

        while let Some((cluster, depth)) = candidates.pop() {
            // Splitting this cluster would grow the live cluster count by
            // one; freeze it as a leaf when a bound blocks that.
            let live = finished.len() + candidates.len() + 1;
            if depth >= self.max_depth || live >= self.max_clusters || cluster.len() < 2 {
                debug!(
                    "keeping cluster of {} points (depth {}, {} live clusters)",
                    cluster.len(),
                    depth,
                    live
                );
                finished.push(cluster);
                continue;
            }

            match self.bisect(data, &cluster, chooser, measure, rng.as_mut()) {
                Ok(Some((left, right))) => {
                    debug!(
                        "split accepted: {} points -> {} + {}",
                        cluster.len(),
                        left.len(),
                        right.len()
                    );
                    candidates.push((left, depth + 1));
                    candidates.push((right, depth + 1));
                }
                Ok(None) => {
                    debug!("split rejected: {} points stay together", cluster.len());
                    finished.push(cluster);
                }
                Err(err) => {
                    // A bisection that cannot be scored is a reject, not a
                    // failure of the whole search.
                    debug!("split attempt failed ({err}); keeping cluster");
                    finished.push(cluster);
                }
            }
        }

        // Deterministic cluster order: by lowest member row.
        finished.sort_by_key(|c| c.members.first().copied().unwrap_or(usize::MAX));
        info!(
            "x-means selected {} clusters for {} points",
            finished.len(),
            data.len()
        );
        Ok(Model::new(finished))
    }

    /// Try to split `parent` in two. Returns the children when the
    /// two-cluster local BIC strictly beats the one-cluster local BIC,
    /// `None` when the parent wins or the split degenerates.
    fn bisect(
        &self,
        data: &[Vec<f64>],
        parent: &Cluster,
        chooser: &dyn CentroidChooser,
        measure: &dyn Distance,
        rng: &mut dyn RngCore,
    ) -> Result<Option<(Cluster, Cluster)>> {
        // Local copy of the member points; k-means and the statistics run
        // on local row indices.
        let local: Vec<Vec<f64>> = parent.members.iter().map(|&row| data[row].clone()).collect();

        let mut kmeans = Kmeans::new(2).with_max_iter(self.max_iter);
        if let Some(workers) = self.workers {
            kmeans = kmeans.with_workers(workers);
        }
        let fit = kmeans.fit_with_rng(&local, chooser, measure, rng)?;

        let mut left = Vec::new();
        let mut right = Vec::new();
        for (row, a) in fit.assignments.iter().enumerate() {
            if a.centroid == 0 {
                left.push(row);
            } else {
                right.push(row);
            }
        }
        if left.is_empty() || right.is_empty() {
            return Ok(None);
        }

        // Both local models are scored on the same local point count.
        let parent_model = Model::new(vec![Cluster::new(
            (0..local.len()).collect(),
            parent.centroid.clone(),
        )]);
        let child_model = Model::new(vec![
            Cluster::new(left.clone(), fit.centroids[0].clone()),
            Cluster::new(right.clone(), fit.centroids[1].clone()),
        ]);

        let parent_bic = bic(&local, &parent_model, measure)?;
        let child_bic = bic(&local, &child_model, measure)?;
        if child_bic <= parent_bic {
            return Ok(None);
        }

        // Lift local rows back to point-matrix rows.
        let lift = |rows: Vec<usize>, centroid: &[f64]| {
            let members = rows.into_iter().map(|i| parent.members[i]).collect();
            Cluster::new(members, centroid.to_vec())
        };
        Ok(Some((
            lift(left, &fit.centroids[0]),
            lift(right, &fit.centroids[1]),
        )))
    }
}

impl Default for XMeans {
    fn default() -> Self {
        Self::new()
    }
}

impl Clustering for XMeans {
    /// Labels from a fit with the default strategies: uniformly sampled
    /// initial centroids and squared Euclidean distance.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.fit(data, &RandomCentroids, &SquaredEuclidean)?.labels()
    }

    /// X-means discovers the number of clusters dynamically, so this
    /// returns 0. Examine the fitted [`Model`] for the actual count.
    fn n_clusters(&self) -> usize {
        0
    }
}
