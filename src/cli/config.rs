//! Run configuration: JSON threshold file merged with command-line overrides

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::args::Cli;
use crate::pipeline::{DiagnoseError, DiagnoseResult};

/// Report thresholds, each a fraction in [0, 1] or unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Thresholds {
    pub feature_max: Option<f64>,
    pub feature_min: Option<f64>,
    pub cover_max: Option<f64>,
    pub cover_min: Option<f64>,
    pub mutual_max: Option<f64>,
    pub mutual_min: Option<f64>,
}

impl Thresholds {
    /// Build thresholds from a name -> value map. Negative values mean unset.
    ///
    /// `width_max` / `width_min` are accepted as older spellings of
    /// `feature_max` / `feature_min`.
    pub fn from_map(values: &HashMap<String, f64>) -> DiagnoseResult<Self> {
        let mut thresholds = Self::default();
        for (name, &value) in values {
            let slot = match name.as_str() {
                "feature_max" | "width_max" => &mut thresholds.feature_max,
                "feature_min" | "width_min" => &mut thresholds.feature_min,
                "cover_max" => &mut thresholds.cover_max,
                "cover_min" => &mut thresholds.cover_min,
                "mutual_max" => &mut thresholds.mutual_max,
                "mutual_min" => &mut thresholds.mutual_min,
                other => {
                    tracing::debug!(key = other, "ignoring unknown threshold");
                    continue;
                }
            };
            *slot = checked(name, value)?;
        }
        Ok(thresholds)
    }

    /// Replace values with command-line overrides that are strictly positive
    pub fn with_overrides(mut self, cli: &Cli) -> DiagnoseResult<Self> {
        let overrides = [
            ("feature_max", cli.feature_max, &mut self.feature_max),
            ("feature_min", cli.feature_min, &mut self.feature_min),
            ("cover_max", cli.cover_max, &mut self.cover_max),
            ("cover_min", cli.cover_min, &mut self.cover_min),
            ("mutual_max", cli.mutual_max, &mut self.mutual_max),
            ("mutual_min", cli.mutual_min, &mut self.mutual_min),
        ];
        for (name, value, slot) in overrides {
            if value > 0.0 {
                *slot = checked(name, value)?;
            }
        }
        Ok(self)
    }

    /// Fraction used to cut the low mutual information report.
    ///
    /// `mutual_min` when set. Otherwise falls back to `mutual_max`, the
    /// fraction earlier releases used for both ends of the ranking.
    pub fn mutual_tail_fraction(&self) -> Option<f64> {
        match (self.mutual_min, self.mutual_max) {
            (Some(min), _) => Some(min),
            (None, Some(max)) => {
                tracing::warn!(
                    mutual_max = max,
                    "mutual_min unset - sizing the low mutual information report from mutual_max"
                );
                Some(max)
            }
            (None, None) => None,
        }
    }
}

fn checked(name: &str, value: f64) -> DiagnoseResult<Option<f64>> {
    if value < 0.0 {
        Ok(None)
    } else if value <= 1.0 {
        Ok(Some(value))
    } else {
        Err(DiagnoseError::InvalidThreshold {
            name: name.to_string(),
            value,
        })
    }
}

/// Read a JSON threshold file.
///
/// A missing file is only an error when `explicit` is set; otherwise all
/// thresholds stay unset.
pub fn load_threshold_file(path: &Path, explicit: bool) -> Result<Thresholds> {
    if !explicit && !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "threshold file not found, all thresholds unset"
        );
        return Ok(Thresholds::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| DiagnoseError::io(path, e))
        .with_context(|| format!("Failed to read threshold file: {}", path.display()))?;
    parse_thresholds(&contents)
        .with_context(|| format!("Failed to load threshold file: {}", path.display()))
}

/// Parse the contents of a threshold file
pub fn parse_thresholds(contents: &str) -> DiagnoseResult<Thresholds> {
    let values: HashMap<String, f64> = serde_json::from_str(contents)
        .map_err(|e| DiagnoseError::Config(format!("invalid threshold JSON: {}", e)))?;
    Thresholds::from_map(&values)
}

/// Immutable settings for one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Configuration {
    pub thresholds: Thresholds,
    pub group_tags: Vec<String>,
    pub enable_mi: bool,
    pub input_file: Option<PathBuf>,
}

impl Configuration {
    /// Resolve the configuration from the threshold file and command-line arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (path, explicit) = cli.config_path();
        let thresholds = load_threshold_file(&path, explicit)?.with_overrides(cli)?;

        let config = Self {
            thresholds,
            group_tags: cli.group_tags(),
            enable_mi: cli.enable_mi,
            input_file: cli.input.clone(),
        };
        tracing::info!(
            thresholds = ?config.thresholds,
            group_tags = ?config.group_tags,
            enable_mi = config.enable_mi,
            "configuration resolved"
        );
        Ok(config)
    }
}
