//! Initial centroid choosers.
//!
//! K-means is sensitive to where its centroids start. The refinement loop
//! never hard-codes a strategy; callers hand it a [`CentroidChooser`] and
//! the loop feeds that chooser its RNG, so a run is reproducible from a
//! seed regardless of which strategy is in play.
//!
//! Three strategies are provided:
//!
//! - [`RandomCentroids`]: k distinct data rows, sampled uniformly.
//! - [`PointCentroids`]: sampled rows nudged by a small jitter, so two
//!   identical rows can still seed distinct centroids.
//! - [`EllipseCentroids`]: centroids spaced around an ellipse fitted to
//!   the data's bounding box, useful when the data rings a center.

use crate::error::{Error, Result};
use rand::prelude::*;

/// Strategy producing `k` initial centroids from a point set.
pub trait CentroidChooser {
    /// Choose `k` starting centroids for `data`.
    ///
    /// Fails with [`Error::EmptyInput`] on an empty point set,
    /// [`Error::InvalidParameter`] when `k` is zero and
    /// [`Error::InvalidClusterCount`] when `k` exceeds the row count.
    fn choose(&self, data: &[Vec<f64>], k: usize, rng: &mut dyn RngCore)
        -> Result<Vec<Vec<f64>>>;
}

/// Shared argument validation: returns the dimensionality.
fn check_choose_args(data: &[Vec<f64>], k: usize) -> Result<usize> {
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
    Ok(d)
}

/// Per-dimension `(min, max)` bounds of the point set.
fn bounds(data: &[Vec<f64>], d: usize) -> Vec<(f64, f64)> {
    let mut out = vec![(f64::INFINITY, f64::NEG_INFINITY); d];
    for point in data {
        for (dim, &x) in point.iter().enumerate() {
            let (lo, hi) = &mut out[dim];
            if x < *lo {
                *lo = x;
            }
            if x > *hi {
                *hi = x;
            }
        }
    }
    out
}

/// Uniform sampling of `k` distinct data rows.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomCentroids;

impl CentroidChooser for RandomCentroids {
    fn choose(
        &self,
        data: &[Vec<f64>],
        k: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Vec<f64>>> {
        check_choose_args(data, k)?;
        let picks = rand::seq::index::sample(rng, data.len(), k);
        Ok(picks.iter().map(|i| data[i].clone()).collect())
    }
}

/// Sampled data rows with a per-coordinate jitter.
///
/// Each chosen row is perturbed by a uniform offset of at most
/// `jitter` times the data's spread in that dimension, in either
/// direction.
#[derive(Clone, Copy, Debug)]
pub struct PointCentroids {
    /// Fraction of the per-dimension spread used as the jitter radius.
    pub jitter: f64,
}

impl Default for PointCentroids {
    fn default() -> Self {
        Self { jitter: 0.05 }
    }
}

impl CentroidChooser for PointCentroids {
    fn choose(
        &self,
        data: &[Vec<f64>],
        k: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Vec<f64>>> {
        let d = check_choose_args(data, k)?;
        if !(self.jitter >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "jitter",
                message: "must be non-negative",
            });
        }

        let spread: Vec<f64> = bounds(data, d).into_iter().map(|(lo, hi)| hi - lo).collect();
        let picks = rand::seq::index::sample(rng, data.len(), k);

        let mut centroids = Vec::with_capacity(k);
        for i in picks {
            let centroid: Vec<f64> = data[i]
                .iter()
                .zip(spread.iter())
                .map(|(&x, &s)| x + (rng.random::<f64>() * 2.0 - 1.0) * self.jitter * s)
                .collect();
            centroids.push(centroid);
        }
        Ok(centroids)
    }
}

/// Centroids spaced at equal angles around an ellipse fitted to the data.
///
/// The ellipse is inscribed in the bounding box of the first two
/// dimensions and scaled by `eccentricity`; any remaining dimensions sit
/// at the box midpoint. Requires at least two dimensions.
#[derive(Clone, Copy, Debug)]
pub struct EllipseCentroids {
    /// Scale factor in `(0, 1]` applied to both semi-axes.
    pub eccentricity: f64,
}

impl Default for EllipseCentroids {
    fn default() -> Self {
        Self { eccentricity: 0.9 }
    }
}

impl CentroidChooser for EllipseCentroids {
    fn choose(
        &self,
        data: &[Vec<f64>],
        k: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<Vec<f64>>> {
        let d = check_choose_args(data, k)?;
        if d < 2 {
            return Err(Error::InvalidParameter {
                name: "dimension",
                message: "ellipse placement needs at least 2 dimensions",
            });
        }
        if !(self.eccentricity > 0.0 && self.eccentricity <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "eccentricity",
                message: "must be in (0, 1]",
            });
        }

        let b = bounds(data, d);
        let mid: Vec<f64> = b.iter().map(|(lo, hi)| (lo + hi) / 2.0).collect();
        let semi_x = (b[0].1 - b[0].0) / 2.0 * self.eccentricity;
        let semi_y = (b[1].1 - b[1].0) / 2.0 * self.eccentricity;

        let mut centroids = Vec::with_capacity(k);
        for i in 0..k {
            let theta = std::f64::consts::TAU * (i as f64) / (k as f64);
            let mut centroid = mid.clone();
            centroid[0] += semi_x * theta.cos();
            centroid[1] += semi_y * theta.sin();
            centroids.push(centroid);
        }
        Ok(centroids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![2.0, 0.0],
            vec![0.0, 2.0],
            vec![2.0, 2.0],
            vec![1.0, 1.0],
        ]
    }

    #[test]
    fn test_random_centroids_shape() {
        let data = grid();
        let mut rng = StdRng::seed_from_u64(42);
        let centroids = RandomCentroids.choose(&data, 3, &mut rng).unwrap();

        assert_eq!(centroids.len(), 3);
        for c in &centroids {
            assert_eq!(c.len(), 2);
            // Every centroid is an actual data row.
            assert!(data.contains(c));
        }
    }

    #[test]
    fn test_random_centroids_distinct_rows() {
        let data = grid();
        let mut rng = StdRng::seed_from_u64(7);
        let centroids = RandomCentroids.choose(&data, 5, &mut rng).unwrap();

        let mut seen = centroids.clone();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        seen.dedup();
        assert_eq!(seen.len(), 5, "sampling is without replacement");
    }

    #[test]
    fn test_point_centroids_stay_near_data() {
        let data = grid();
        let mut rng = StdRng::seed_from_u64(42);
        let chooser = PointCentroids { jitter: 0.1 };
        let centroids = chooser.choose(&data, 4, &mut rng).unwrap();

        assert_eq!(centroids.len(), 4);
        // Spread per dimension is 2.0, so no coordinate can leave the
        // bounding box by more than jitter * spread.
        for c in &centroids {
            for &x in c {
                assert!((-0.2..=2.2).contains(&x), "coordinate {x} out of range");
            }
        }
    }

    #[test]
    fn test_ellipse_centroids_on_ellipse() {
        let data = grid();
        let mut rng = StdRng::seed_from_u64(42);
        let chooser = EllipseCentroids { eccentricity: 1.0 };
        let centroids = chooser.choose(&data, 4, &mut rng).unwrap();

        assert_eq!(centroids.len(), 4);
        // Bounding box center is (1, 1), semi-axes are 1. Every centroid
        // satisfies the ellipse equation.
        for c in &centroids {
            let e = (c[0] - 1.0).powi(2) + (c[1] - 1.0).powi(2);
            assert!((e - 1.0).abs() < 1e-9, "centroid {c:?} off the ellipse");
        }
    }

    #[test]
    fn test_ellipse_rejects_1d() {
        let data = vec![vec![0.0], vec![1.0], vec![2.0]];
        let mut rng = StdRng::seed_from_u64(42);
        let result = EllipseCentroids::default().choose(&data, 2, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn test_choose_errors() {
        let mut rng = StdRng::seed_from_u64(42);

        let empty: Vec<Vec<f64>> = vec![];
        assert!(matches!(
            RandomCentroids.choose(&empty, 1, &mut rng),
            Err(Error::EmptyInput)
        ));

        let data = grid();
        assert!(matches!(
            RandomCentroids.choose(&data, 0, &mut rng),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            RandomCentroids.choose(&data, 6, &mut rng),
            Err(Error::InvalidClusterCount {
                requested: 6,
                n_items: 5
            })
        ));
    }

    #[test]
    fn test_choose_ragged_rows() {
        let data = vec![vec![0.0, 0.0], vec![1.0]];
        let mut rng = StdRng::seed_from_u64(42);
        assert!(matches!(
            RandomCentroids.choose(&data, 1, &mut rng),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
