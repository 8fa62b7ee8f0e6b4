//! Input stream loader and the streaming aggregation pass

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use indicatif::ProgressBar;

use super::aggregator::{IndexSnapshot, RowAggregator};
use super::error::{DiagnoseError, DiagnoseResult};
use super::parser::parse_row;
use crate::utils::{create_row_counter, finish_with_success, finish_with_warning};

/// How often the row counter on the spinner is refreshed
const PROGRESS_INTERVAL: u64 = 10_000;

/// Open the sample stream: the named file, or standard input when `None`
pub fn open_input(path: Option<&Path>) -> DiagnoseResult<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| DiagnoseError::io(path, e))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Fold every line of `reader` into a fresh aggregator and freeze it.
///
/// Aborts on the first malformed line; no partial snapshot is returned.
pub fn aggregate_stream<R: BufRead>(
    reader: R,
    group_tags: &[String],
) -> DiagnoseResult<IndexSnapshot> {
    aggregate_with(reader, group_tags, &ProgressBar::hidden(), "<stream>")
}

/// Run the aggregation pass over the configured input with a row counter spinner
pub fn aggregate_input_with_progress(
    path: Option<&Path>,
    group_tags: &[String],
) -> DiagnoseResult<IndexSnapshot> {
    let reader = open_input(path)?;
    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    let pb = create_row_counter();
    let result = aggregate_with(reader, group_tags, &pb, &source);
    match &result {
        Ok(snapshot) => finish_with_success(&pb, &format!("Read {} rows", snapshot.row_count())),
        Err(_) => finish_with_warning(&pb, "Aggregation aborted"),
    }
    result
}

fn aggregate_with<R: BufRead>(
    mut reader: R,
    group_tags: &[String],
    pb: &ProgressBar,
    source: &str,
) -> DiagnoseResult<IndexSnapshot> {
    let mut aggregator = RowAggregator::new(group_tags);
    let mut buf = Vec::new();
    let mut line_number: u64 = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| DiagnoseError::io(source, e))?;
        if read == 0 {
            break;
        }
        line_number += 1;

        // Invalid UTF-8 bytes decode to U+FFFD
        let line = String::from_utf8_lossy(&buf);
        let row = parse_row(&line, line_number)?;
        aggregator.observe(&row);

        if line_number % PROGRESS_INTERVAL == 0 {
            pb.set_position(line_number);
        }
    }
    pb.set_position(line_number);

    let snapshot = aggregator.freeze();
    tracing::debug!(
        rows = snapshot.row_count(),
        features = snapshot.feature_count(),
        "aggregation pass complete"
    );
    Ok(snapshot)
}
