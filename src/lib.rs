//! Dense clustering with automatic model selection.
//!
//! `xmeans` is a small library for k-means clustering of dense `f64`
//! vectors, built around a concurrent assignment engine, plus an x-means
//! layer that discovers the number of clusters by recursive bisection
//! scored with the Bayesian Information Criterion.
//!
//! The primary public API is under [`cluster`], which provides:
//! - k-means (pluggable centroid choosers, parallel assignment, Lloyd
//!   iterations)
//! - x-means (BIC-driven split/accept/reject model search)
//! - the statistics behind the search (variance, log-likelihood, BIC)
//!
//! [`io`] loads point matrices from delimited text files.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod io;

pub use cluster::{
    bic, compute_centroid, free_params, log_likelihood, nearest_centroid, point_prob, variance,
    Assignment, CentroidChooser, Cluster, Clustering, Distance, EllipseCentroids, Kmeans,
    KmeansFit, Manhattan, Model, PointCentroids, RandomCentroids, SquaredEuclidean, XMeans,
};
pub use error::{Error, Result};
