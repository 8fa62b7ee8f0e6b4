//! Error types for the diagnosis pipeline.
//!
//! Each variant maps to one failure mode of a run. `DegenerateLabels` is the
//! only one the orchestrator treats as non-fatal: it aborts the mutual
//! information stage while the summary and coverage reports stay valid.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while parsing, aggregating, or ranking samples.
#[derive(Error, Debug)]
pub enum DiagnoseError {
    /// A line produced fewer than two tab-separated fields.
    #[error("Malformed sample on line {line}: {content:?} (expected label followed by at least one feature)")]
    MalformedRow {
        /// 1-based line number in the input stream
        line: u64,
        /// The offending line, trimmed
        content: String,
    },

    /// The input stream contained no samples.
    #[error("Input contains no samples - cannot compute ratios")]
    EmptyInput,

    /// Only one label class was present in the input.
    #[error("All {rows} samples share one label ({positive} positive) - mutual information is undefined")]
    DegenerateLabels {
        /// Number of positive samples
        positive: u64,
        /// Total number of samples
        rows: u64,
    },

    /// A file could not be opened, read or written.
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        /// The file that failed
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A threshold lies outside [0, 1].
    #[error("Threshold {name} must be between 0.0 and 1.0, got {value}")]
    InvalidThreshold { name: String, value: f64 },

    /// The threshold file could not be understood.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DiagnoseError {
    /// Wrap an I/O error together with the path that produced it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type DiagnoseResult<T> = std::result::Result<T, DiagnoseError>;
