//! Pluggable distance measures.
//!
//! Every layer that compares points (the assignment engine, the refinement
//! loop, the cluster statistics) takes a `&dyn Distance` argument, so the
//! measure in effect is a pure input chosen once per run and threaded
//! through, never ambient state.
//!
//! `Sync` is part of the trait bound because the assignment engine shares
//! one measure across its worker threads.

use crate::error::{Error, Result};

/// Scalar distance between two equal-length vectors.
pub trait Distance: Sync {
    /// Distance between `a` and `b`.
    ///
    /// Returns [`Error::DimensionMismatch`] when the vectors differ in
    /// length.
    fn measure(&self, a: &[f64], b: &[f64]) -> Result<f64>;
}

#[inline]
fn check_dims(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

/// Squared Euclidean distance: sum of squared coordinate differences.
///
/// The default measure for k-means; also the quantity the Gaussian cluster
/// statistics treat as the squared deviation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SquaredEuclidean;

impl Distance for SquaredEuclidean {
    #[inline]
    fn measure(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        check_dims(a, b)?;
        Ok(a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum())
    }
}

/// Manhattan distance: sum of absolute coordinate differences.
#[derive(Clone, Copy, Debug, Default)]
pub struct Manhattan;

impl Distance for Manhattan {
    #[inline]
    fn measure(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        check_dims(a, b)?;
        Ok(a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum())
    }
}
