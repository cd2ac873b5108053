//! Cluster statistics for BIC model selection.
//!
//! Everything the x-means selector needs to score a candidate partition:
//!
//! - [`variance`]: maximum-likelihood variance estimate of one cluster
//! - [`point_prob`]: Gaussian density of a point under an
//!   isotropic-variance cluster model, weighted by the cluster's share of
//!   the data
//! - [`free_params`]: parameter count charged by BIC
//! - [`log_likelihood`]: model fit, accumulated in log space
//! - [`bic`]: the Bayesian Information Criterion (higher is better)
//!
//! A [`Cluster`] is a membership view over the point matrix — row indices
//! plus a centroid — never a copy of the points. A [`Model`] is an ordered
//! set of clusters that partitions every row exactly once.
//!
//! All statistics fail fast with an explicit error on empty clusters,
//! non-positive variance or mismatched dimensions; none of them silently
//! produce NaN or infinity.

use super::distance::Distance;
use crate::error::{Error, Result};

/// A cluster: member rows of the point matrix bound to one centroid.
///
/// Ownership of the points stays with the matrix; the cluster stores only
/// membership. Built once, never mutated.
#[derive(Clone, Debug)]
pub struct Cluster {
    /// Row indices of the member points.
    pub members: Vec<usize>,
    /// The cluster's centroid.
    pub centroid: Vec<f64>,
}

impl Cluster {
    /// Bind `members` to `centroid`.
    pub fn new(members: Vec<usize>, centroid: Vec<f64>) -> Self {
        Self { members, centroid }
    }

    /// Number of member points.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the cluster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Dimensionality of the centroid.
    pub fn dims(&self) -> usize {
        self.centroid.len()
    }
}

/// An ordered set of clusters partitioning all points exactly once.
#[derive(Clone, Debug)]
pub struct Model {
    /// The clusters, in selection order.
    pub clusters: Vec<Cluster>,
}

impl Model {
    /// Wrap a set of clusters as a model.
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether the model has no clusters.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Total number of member points across all clusters.
    pub fn point_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// One cluster label per point row.
    ///
    /// Verifies the partition invariant while building: every row in
    /// `0..point_count` appears in exactly one cluster. A model that
    /// violates it is reported as corrupt rather than returned as labels.
    pub fn labels(&self) -> Result<Vec<usize>> {
        let n = self.point_count();
        let mut labels = vec![usize::MAX; n];
        for (c, cluster) in self.clusters.iter().enumerate() {
            for &row in &cluster.members {
                if row >= n || labels[row] != usize::MAX {
                    return Err(Error::Other(format!(
                        "model is not a partition: row {row} repeated or out of range"
                    )));
                }
                labels[row] = c;
            }
        }
        Ok(labels)
    }
}

/// Maximum-likelihood variance estimate of a cluster.
///
/// Sum over member points of the measured deviation from the centroid,
/// divided by `pointCount - dimensionCount`; the denominator is floored at
/// 1 so small clusters cannot divide by zero or a negative.
pub fn variance(data: &[Vec<f64>], cluster: &Cluster, measure: &dyn Distance) -> Result<f64> {
    if cluster.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut sum = 0.0;
    for &row in &cluster.members {
        sum += measure.measure(&data[row], &cluster.centroid)?;
    }

    let denom = cluster.len().saturating_sub(cluster.dims()).max(1);
    Ok(sum / denom as f64)
}

/// Gaussian density of `point` under an isotropic-variance cluster model,
/// scaled by the cluster's share of the data:
///
/// ```text
/// (Ri/R) · (2π·V)^(-dims/2) · exp(-sqdist / (2V))
/// ```
///
/// where `sqdist` is the squared deviation reported by the active measure
/// (for [`SquaredEuclidean`](super::SquaredEuclidean) the measure already
/// is the squared distance). `r_total` is the model-wide
/// point count R, `r_cluster` the cluster's point count Ri.
///
/// Fails with [`Error::InvalidParameter`] on non-positive variance.
pub fn point_prob(
    r_total: usize,
    r_cluster: usize,
    variance: f64,
    point: &[f64],
    mean: &[f64],
    measure: &dyn Distance,
) -> Result<f64> {
    Ok(log_point_prob(r_total, r_cluster, variance, point, mean, measure)?.exp())
}

/// `ln(point_prob)` computed directly in log space, so tight clusters and
/// far outliers cannot underflow the density before the logarithm.
fn log_point_prob(
    r_total: usize,
    r_cluster: usize,
    variance: f64,
    point: &[f64],
    mean: &[f64],
    measure: &dyn Distance,
) -> Result<f64> {
    if r_total == 0 || r_cluster == 0 || r_cluster > r_total {
        return Err(Error::InvalidParameter {
            name: "r_cluster",
            message: "cluster and total point counts must satisfy 0 < Ri <= R",
        });
    }
    if !(variance > 0.0) {
        return Err(Error::InvalidParameter {
            name: "variance",
            message: "must be positive",
        });
    }

    let sqdist = measure.measure(point, mean)?;
    let dims = mean.len() as f64;
    let weight = (r_cluster as f64 / r_total as f64).ln();
    let norm = -(dims / 2.0) * (2.0 * std::f64::consts::PI * variance).ln();
    Ok(weight + norm - sqdist / (2.0 * variance))
}

/// Free-parameter count charged by BIC for `clusters` clusters of
/// dimensionality `dims`: each cluster carries its centroid coordinates
/// plus one variance term, so the total is `clusters · (dims + 1)`.
pub fn free_params(clusters: usize, dims: usize) -> usize {
    clusters * (dims + 1)
}

/// Log-likelihood of a model: `Σ ln(point_prob)` over every member of
/// every cluster, accumulated in log space.
pub fn log_likelihood(data: &[Vec<f64>], model: &Model, measure: &dyn Distance) -> Result<f64> {
    if model.is_empty() {
        return Err(Error::EmptyInput);
    }

    let r_total = model.point_count();
    let mut ll = 0.0;
    for cluster in &model.clusters {
        let v = variance(data, cluster, measure)?;
        for &row in &cluster.members {
            ll += log_point_prob(r_total, cluster.len(), v, &data[row], &cluster.centroid, measure)?;
        }
    }
    Ok(ll)
}

/// Bayesian Information Criterion of a model:
///
/// ```text
/// BIC = loglikelihood - 0.5 · freeParameters · ln(R)
/// ```
///
/// Higher is better. Fails on empty models, empty clusters, non-positive
/// variance or mismatched cluster dimensionalities.
pub fn bic(data: &[Vec<f64>], model: &Model, measure: &dyn Distance) -> Result<f64> {
    if model.is_empty() {
        return Err(Error::EmptyInput);
    }

    let dims = model.clusters[0].dims();
    for cluster in &model.clusters {
        if cluster.dims() != dims {
            return Err(Error::DimensionMismatch {
                expected: dims,
                found: cluster.dims(),
            });
        }
    }

    let r_total = model.point_count();
    let ll = log_likelihood(data, model, measure)?;
    let penalty = 0.5 * free_params(model.len(), dims) as f64 * (r_total as f64).ln();
    Ok(ll - penalty)
}
