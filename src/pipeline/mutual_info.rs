//! Mutual information between feature presence and the binary label
//!
//! Scores are computed by a fixed pool of worker threads fed from a bounded
//! queue. Every score depends only on the snapshot's label totals and the
//! feature's own counts, so workers share nothing but the read-only snapshot.

use std::num::NonZeroUsize;
use std::thread;

use crossbeam_channel::bounded;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;

use super::aggregator::IndexSnapshot;
use super::error::{DiagnoseError, DiagnoseResult};
use crate::utils::{create_progress_bar, finish_with_success};

/// Display factor applied to the normalized score
pub const SCORE_SCALE: f64 = 10_000.0;

/// A feature with its mutual information score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutualInformationRecord {
    pub feature: String,
    pub score: f64,
}

/// 2x2 joint counts of feature presence against label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContingencyTable {
    /// present, positive
    pub tt: u64,
    /// present, negative
    pub tf: u64,
    /// absent, positive
    pub ft: u64,
    /// absent, negative
    pub ff: u64,
}

impl ContingencyTable {
    /// Build the table from a feature's row counts and the label totals.
    ///
    /// Requires `positive_appearance <= appearance`, `positive_appearance <= positive_count`
    /// and `appearance - positive_appearance <= negative_count`, which the aggregation
    /// pass guarantees.
    pub fn from_counts(
        appearance: u64,
        positive_appearance: u64,
        positive_count: u64,
        negative_count: u64,
    ) -> Self {
        let tt = positive_appearance;
        let tf = appearance - tt;
        Self {
            tt,
            tf,
            ft: positive_count - tt,
            ff: negative_count - tf,
        }
    }

    pub fn total(&self) -> u64 {
        self.tt + self.tf + self.ft + self.ff
    }

    /// Scaled mutual information, `sum(c * ln(N * c / (row * col))) / N * 10000`.
    ///
    /// Empty cells contribute nothing.
    pub fn mutual_information(&self) -> f64 {
        let total = self.total() as f64;
        if total == 0.0 {
            return 0.0;
        }

        let present = (self.tt + self.tf) as f64;
        let absent = (self.ft + self.ff) as f64;
        let positive = (self.tt + self.ft) as f64;
        let negative = (self.tf + self.ff) as f64;

        let cells = [
            (self.tt, present, positive),
            (self.tf, present, negative),
            (self.ft, absent, positive),
            (self.ff, absent, negative),
        ];

        let sum: f64 = cells
            .iter()
            .filter(|(count, _, _)| *count > 0)
            .map(|&(count, row, col)| {
                let count = count as f64;
                count * (total * count / (row * col)).ln()
            })
            .sum();

        sum / total * SCORE_SCALE
    }
}

/// Worker pool sizing
#[derive(Debug, Clone, Copy)]
pub struct MiOptions {
    /// Number of worker threads
    pub workers: usize,
    /// Capacity of the work and result queues
    pub queue_capacity: usize,
}

impl MiOptions {
    /// Queue slots allotted to each worker
    const SLOTS_PER_WORKER: usize = 4;

    /// Size the pool for `workers` threads, at least one
    pub fn with_workers(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            workers,
            queue_capacity: workers.saturating_mul(Self::SLOTS_PER_WORKER),
        }
    }
}

impl Default for MiOptions {
    fn default() -> Self {
        Self::with_workers(
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        )
    }
}

/// Score every feature in the snapshot and rank them by descending score.
///
/// Ties are ordered by feature name so repeated runs produce identical output.
///
/// # Errors
/// * `EmptyInput` when the snapshot holds no rows
/// * `DegenerateLabels` when only one label class is present
pub fn compute_mutual_information(
    snapshot: &IndexSnapshot,
    options: &MiOptions,
) -> DiagnoseResult<Vec<MutualInformationRecord>> {
    ensure_both_labels(snapshot)?;

    let workers = options.workers.max(1);
    let capacity = options.queue_capacity.max(1);
    tracing::info!(
        workers,
        queue_capacity = capacity,
        features = snapshot.feature_count(),
        "starting mutual information workers"
    );

    let pb = create_progress_bar(snapshot.feature_count() as u64, "Scoring features");

    let mut records = run_worker_pool(snapshot, workers, capacity, &pb);

    finish_with_success(&pb, &format!("Scored {} features", records.len()));

    rank_records(&mut records);
    Ok(records)
}

fn ensure_both_labels(snapshot: &IndexSnapshot) -> DiagnoseResult<()> {
    let rows = snapshot.row_count();
    if rows == 0 {
        return Err(DiagnoseError::EmptyInput);
    }
    let positive = snapshot.positive_count();
    if positive == 0 || positive == rows {
        return Err(DiagnoseError::DegenerateLabels { positive, rows });
    }
    Ok(())
}

/// Producer -> workers -> collector, with a supervisor closing the result queue
fn run_worker_pool(
    snapshot: &IndexSnapshot,
    workers: usize,
    capacity: usize,
    pb: &ProgressBar,
) -> Vec<MutualInformationRecord> {
    let (work_tx, work_rx) = bounded::<(&str, u64)>(capacity);
    let (result_tx, result_rx) = bounded::<MutualInformationRecord>(capacity);

    let positive_count = snapshot.positive_count();
    let negative_count = snapshot.negative_count();

    thread::scope(|s| {
        s.spawn(move || {
            for (feature, &appearance) in snapshot.appearance() {
                if work_tx.send((feature.as_str(), appearance)).is_err() {
                    break;
                }
            }
        });

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move || {
                    for (feature, appearance) in work_rx {
                        let table = ContingencyTable::from_counts(
                            appearance,
                            snapshot.positive_appearance(feature),
                            positive_count,
                            negative_count,
                        );
                        let record = MutualInformationRecord {
                            feature: feature.to_string(),
                            score: table.mutual_information(),
                        };
                        if result_tx.send(record).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();
        drop(work_rx);

        let supervisor = s.spawn(move || {
            let mut panicked = None;
            for handle in handles {
                if let Err(payload) = handle.join() {
                    panicked.get_or_insert(payload);
                }
            }
            drop(result_tx);
            panicked
        });

        let mut records = Vec::with_capacity(snapshot.feature_count());
        for record in result_rx {
            pb.inc(1);
            records.push(record);
        }

        if let Ok(Some(payload)) = supervisor.join() {
            std::panic::resume_unwind(payload);
        }
        records
    })
}

/// Sort descending by score, ties by feature name
pub fn rank_records(records: &mut [MutualInformationRecord]) {
    records.par_sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.feature.cmp(&b.feature))
    });
}

/// Ranked records split into the high and low mutual information reports
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutualInformationPartition {
    /// Top-ranked records, `None` when no head threshold is set
    pub more: Option<Vec<MutualInformationRecord>>,
    /// Bottom-ranked records, `None` when no tail threshold is set
    pub less: Option<Vec<MutualInformationRecord>>,
}

/// Split ranked records by position.
///
/// The first `floor(head_fraction * rows)` records form the high report.
/// Records ranked strictly after `floor((1 - tail_fraction) * rows)` form
/// the low report. Records in between appear in neither.
pub fn partition_by_rank(
    ranked: &[MutualInformationRecord],
    row_count: u64,
    head_fraction: Option<f64>,
    tail_fraction: Option<f64>,
) -> MutualInformationPartition {
    let rows = row_count as f64;

    let more = head_fraction.map(|fraction| {
        let head = ((fraction * rows).floor() as usize).min(ranked.len());
        ranked[..head].to_vec()
    });

    let less = tail_fraction.map(|fraction| {
        let tail = (((1.0 - fraction) * rows).floor() as usize).min(ranked.len());
        ranked[tail..].to_vec()
    });

    MutualInformationPartition { more, less }
}
