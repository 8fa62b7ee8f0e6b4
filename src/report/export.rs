//! JSON export of a complete diagnosis

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use super::coverage::CoveragePartition;
use super::summary::SampleSummary;
use crate::cli::{Configuration, Thresholds};
use crate::pipeline::MutualInformationRecord;

/// Metadata about the diagnosis run
#[derive(Serialize)]
pub struct DiagnosisMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub featdiag_version: String,
    /// Input file, or `<stdin>`
    pub input_file: String,
    pub thresholds: Thresholds,
    pub group_tags: Vec<String>,
    pub enable_mi: bool,
}

/// Mutual information outcome of the run
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MutualInformationExport<'a> {
    Disabled,
    Skipped { reason: String },
    Computed { features: &'a [MutualInformationRecord] },
}

/// Complete diagnosis export
#[derive(Serialize)]
pub struct DiagnosisExport<'a> {
    pub metadata: DiagnosisMetadata,
    pub summary: &'a SampleSummary,
    pub coverage: &'a CoveragePartition,
    pub mutual_information: MutualInformationExport<'a>,
}

impl<'a> DiagnosisExport<'a> {
    pub fn new(
        config: &Configuration,
        summary: &'a SampleSummary,
        coverage: &'a CoveragePartition,
        mutual_information: MutualInformationExport<'a>,
    ) -> Self {
        Self {
            metadata: DiagnosisMetadata {
                timestamp: Utc::now().to_rfc3339(),
                featdiag_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: config
                    .input_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<stdin>".to_string()),
                thresholds: config.thresholds,
                group_tags: config.group_tags.clone(),
                enable_mi: config.enable_mi,
            },
            summary,
            coverage,
            mutual_information,
        }
    }
}

/// Write the diagnosis as pretty-printed JSON
pub fn export_diagnosis(export: &DiagnosisExport<'_>, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(export).context("Failed to serialize diagnosis to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write diagnosis to {}", output_path.display()))?;

    Ok(())
}
