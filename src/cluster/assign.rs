//! Concurrent point-to-centroid assignment.
//!
//! The assignment step is the only parallel region of the crate, scoped to
//! a single refinement iteration. The shape is a classic fan-out/fan-in:
//!
//! 1. A producer publishes one job per point row on a bounded queue sized
//!    `min(1024, R)`, so a huge matrix cannot balloon the queue while the
//!    pipeline still stays deep.
//! 2. A fixed pool of workers pulls jobs until the queue drains. A worker
//!    finds the nearest centroid for its row (ties go to the lowest
//!    centroid index) and posts `(row, result)` on the results channel.
//! 3. The calling thread aggregates exactly `R` results, writing each into
//!    its own row of the assignment table and folding the "did any row
//!    switch centroid" flag that drives k-means convergence.
//!
//! The table is partitioned by row: every result targets a distinct row
//! and only the aggregator writes, so the table needs no lock. A row whose
//! dimensionality does not match the centroids fails alone; its error is
//! surfaced to the caller after all rows are drained, and sibling rows are
//! unaffected.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use super::distance::Distance;
use crate::error::{Error, Result};

/// Upper bound on queued jobs, independent of the row count.
const MAX_QUEUED_JOBS: usize = 1024;

/// Sentinel for a table row that has not been assigned yet.
///
/// A fresh table starts every row here so the first engine run always
/// reports a change.
pub(crate) const UNASSIGNED: usize = usize::MAX;

/// One row of the assignment table: the nearest centroid and the distance
/// to it under the measure in effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assignment {
    /// Index of the nearest centroid.
    pub centroid: usize,
    /// Distance from the point to that centroid.
    pub distance: f64,
}

impl Assignment {
    pub(crate) fn unset() -> Self {
        Self {
            centroid: UNASSIGNED,
            distance: 0.0,
        }
    }
}

type RowResult = (usize, Result<(usize, f64)>);

/// Find the nearest centroid to `point`.
///
/// Returns `(centroid index, distance)`. Ties are broken toward the lowest
/// centroid index, which keeps repeated runs deterministic.
pub fn nearest_centroid(
    point: &[f64],
    centroids: &[Vec<f64>],
    measure: &dyn Distance,
) -> Result<(usize, f64)> {
    if centroids.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut min_index = 0;
    let mut min_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let d = measure.measure(point, centroid)?;
        if d < min_distance {
            min_distance = d;
            min_index = i;
        }
    }
    Ok((min_index, min_distance))
}

/// Assign every row of `data` to its nearest centroid, in parallel.
///
/// Writes into `table` (one row per point) and returns whether any row's
/// centroid index changed relative to the table's previous contents.
///
/// The engine publishes exactly `R` jobs and consumes exactly `R` results
/// before returning; a caller never observes a half-written table. The
/// first per-row failure is returned after the drain completes.
pub(crate) fn assign_all(
    data: &[Vec<f64>],
    centroids: &[Vec<f64>],
    measure: &dyn Distance,
    table: &mut [Assignment],
    workers: usize,
) -> Result<bool> {
    let n = data.len();
    debug_assert_eq!(table.len(), n);
    if n == 0 {
        return Ok(false);
    }

    let pool = workers.clamp(1, n);
    let queue_bound = n.min(MAX_QUEUED_JOBS);

    let (job_tx, job_rx) = mpsc::sync_channel::<usize>(queue_bound);
    let job_rx = Arc::new(Mutex::new(job_rx));
    let (result_tx, result_rx) = mpsc::channel::<RowResult>();

    thread::scope(|scope| {
        for _ in 0..pool {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            scope.spawn(move || loop {
                // Hold the lock only to pull the next row; the distance
                // work below runs unlocked.
                let row = {
                    let Ok(queue) = job_rx.lock() else { return };
                    match queue.recv() {
                        Ok(row) => row,
                        // Producer hung up and the queue is drained.
                        Err(_) => return,
                    }
                };
                let outcome = nearest_centroid(&data[row], centroids, measure);
                if result_tx.send((row, outcome)).is_err() {
                    return;
                }
            });
        }
        // The workers hold the only remaining senders; drop ours so the
        // results channel closes once they finish. Same for the job
        // receiver: if every worker exits, the producer's send fails
        // instead of blocking on a queue nobody drains.
        drop(result_tx);
        drop(job_rx);

        // Producer: one job per row, blocking while the bounded queue
        // is full.
        scope.spawn(move || {
            for row in 0..n {
                if job_tx.send(row).is_err() {
                    return;
                }
            }
        });

        let mut changed = false;
        let mut first_failure = None;
        for _ in 0..n {
            let (row, outcome) = match result_rx.recv() {
                Ok(msg) => msg,
                // Workers can only disappear early if the runtime tore a
                // thread down; report instead of hanging.
                Err(_) => {
                    return Err(Error::Other(
                        "assignment workers exited before draining all rows".to_string(),
                    ))
                }
            };
            match outcome {
                Ok((centroid, distance)) => {
                    if table[row].centroid != centroid {
                        changed = true;
                    }
                    table[row] = Assignment { centroid, distance };
                }
                Err(err) => {
                    // Keep draining; the failure poisons this row only.
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(changed),
        }
    })
}
