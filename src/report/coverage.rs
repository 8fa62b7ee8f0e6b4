//! Feature coverage partition

use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use super::writer::{write_records, ReportPaths};
use crate::pipeline::{DiagnoseError, DiagnoseResult, IndexSnapshot};

/// A feature's coverage count and its share of rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageEntry {
    pub feature: String,
    pub count: u64,
    pub ratio: f64,
}

/// Every feature's coverage, plus those outside the configured bounds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoveragePartition {
    /// All features, always written
    pub all: Vec<CoverageEntry>,
    /// Features with ratio above `cover_max`, `None` when unset
    pub more: Option<Vec<CoverageEntry>>,
    /// Features with ratio below `cover_min`, `None` when unset
    pub less: Option<Vec<CoverageEntry>>,
}

/// List every feature's coverage and split off those outside the bounds.
///
/// Both bounds are strict; a feature exactly at a bound lands in neither list.
/// Lists are sorted by count descending, then by feature name.
pub fn partition_coverage(
    snapshot: &IndexSnapshot,
    cover_max: Option<f64>,
    cover_min: Option<f64>,
) -> DiagnoseResult<CoveragePartition> {
    let rows = snapshot.row_count();
    if rows == 0 {
        return Err(DiagnoseError::EmptyInput);
    }

    let mut all: Vec<CoverageEntry> = snapshot
        .coverage()
        .par_iter()
        .map(|(feature, &count)| CoverageEntry {
            feature: feature.clone(),
            count,
            ratio: count as f64 / rows as f64,
        })
        .collect();
    all.par_sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.feature.cmp(&b.feature)));

    let select = |keep: &dyn Fn(f64) -> bool| -> Vec<CoverageEntry> {
        all.iter().filter(|e| keep(e.ratio)).cloned().collect()
    };
    let more = cover_max.map(|max| select(&|ratio: f64| ratio > max));
    let less = cover_min.map(|min| select(&|ratio: f64| ratio < min));

    Ok(CoveragePartition { all, more, less })
}

impl CoveragePartition {
    /// Write the full listing and each bounded list that was computed, as `feature<TAB>count`
    pub fn write(&self, paths: &ReportPaths) -> DiagnoseResult<()> {
        write_entries(&paths.coverage, &self.all)?;
        let bounded = [
            (&self.more, &paths.coverage_more),
            (&self.less, &paths.coverage_less),
        ];
        for (entries, path) in bounded {
            if let Some(entries) = entries {
                write_entries(path, entries)?;
            }
        }
        Ok(())
    }
}

fn write_entries(path: &Path, entries: &[CoverageEntry]) -> DiagnoseResult<()> {
    write_records(path, entries.iter().map(|e| (&e.feature, e.count)))
}
