//! High and low mutual information reports

use std::path::Path;

use super::writer::write_records;
use crate::pipeline::{DiagnoseResult, MutualInformationPartition, MutualInformationRecord};

/// Write the computed halves of the partition as `feature<TAB>score`, keeping rank order
pub fn write_mutual_reports(
    partition: &MutualInformationPartition,
    more_path: &Path,
    less_path: &Path,
) -> DiagnoseResult<()> {
    if let Some(more) = &partition.more {
        write_scores(more_path, more)?;
    }
    if let Some(less) = &partition.less {
        write_scores(less_path, less)?;
    }
    Ok(())
}

fn write_scores(path: &Path, records: &[MutualInformationRecord]) -> DiagnoseResult<()> {
    write_records(
        path,
        records
            .iter()
            .map(|r| (&r.feature, format!("{:.4}", r.score))),
    )
}
