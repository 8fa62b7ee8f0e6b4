//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

/// Threshold file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "thresholds.json";

/// featdiag - Diagnose sparse labeled samples: widths, coverage and mutual information
#[derive(Parser, Debug)]
#[command(name = "featdiag")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Sample file, one `label<TAB>feature[:value]...` row per line.
    /// Reads standard input when omitted.
    pub input: Option<PathBuf>,

    /// JSON threshold file (object of threshold name to number).
    /// Defaults to ./thresholds.json; a missing default file leaves all thresholds unset.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory the report files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Upper bound on feature width for reporting (overrides the threshold file when positive)
    #[arg(long, default_value = "-1", allow_negative_numbers = true, value_parser = validate_threshold)]
    pub feature_max: f64,

    /// Lower bound on feature width for reporting (overrides the threshold file when positive)
    #[arg(long, default_value = "-1", allow_negative_numbers = true, value_parser = validate_threshold)]
    pub feature_min: f64,

    /// Coverage ratio above which a feature is listed as over-covered
    #[arg(long, default_value = "-1", allow_negative_numbers = true, value_parser = validate_threshold)]
    pub cover_max: f64,

    /// Coverage ratio below which a feature is listed as under-covered
    #[arg(long, default_value = "-1", allow_negative_numbers = true, value_parser = validate_threshold)]
    pub cover_min: f64,

    /// Fraction of rows (by rank) reported as high mutual information
    #[arg(long, default_value = "-1", allow_negative_numbers = true, value_parser = validate_threshold)]
    pub mutual_max: f64,

    /// Fraction of rows (by rank) reported as low mutual information
    #[arg(long, default_value = "-1", allow_negative_numbers = true, value_parser = validate_threshold)]
    pub mutual_min: f64,

    /// Feature group tags, separated by comma. A row counts toward a tag when
    /// any of its features contains the tag.
    #[arg(long, default_value = "")]
    pub group_tag: String,

    /// Enable mutual information evaluation (expensive on wide inputs)
    #[arg(long, default_value = "false")]
    pub enable_mi: bool,

    /// Number of mutual information worker threads (defaults to available cores)
    #[arg(long, value_parser = validate_workers)]
    pub workers: Option<usize>,

    /// Also write the whole diagnosis to diagnosis.json
    #[arg(long, default_value = "false")]
    pub export_json: bool,

    /// Suppress the banner and summary table
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Group tags in the order given, trimmed of spaces and quotes, without blanks or repeats
    pub fn group_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.group_tag.split(',') {
            let tag = tag.trim_matches(|c| c == ' ' || c == '"');
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }

    /// Threshold file path and whether it was given explicitly
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (Path::new(DEFAULT_CONFIG_FILE).to_path_buf(), false),
        }
    }
}

/// Upper bound on `--workers`
pub const MAX_WORKERS: usize = 1024;

fn validate_workers(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid worker count", s))?;

    if (1..=MAX_WORKERS).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, value
        ))
    }
}

/// Validator for threshold overrides: negative means unset, otherwise 0.0..=1.0
fn validate_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 1.0 || value.is_nan() {
        Err(format!(
            "threshold must be between 0.0 and 1.0 (or negative for unset), got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
