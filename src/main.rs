//! featdiag: Sparse Sample Diagnosis CLI Tool
//!
//! Reads `label<TAB>feature[:value]...` samples from a file or standard input
//! and writes summary, coverage and mutual information reports.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use featdiag::cli::{Cli, Configuration};
use featdiag::pipeline::{
    aggregate_input_with_progress, compute_mutual_information, partition_by_rank, DiagnoseError,
    IndexSnapshot, MiOptions, MutualInformationRecord,
};
use featdiag::report::{
    export_diagnosis, partition_coverage, write_mutual_reports, DiagnosisExport,
    MutualInformationExport, ReportPaths, SampleSummary, COVERAGE_FILE,
};
use featdiag::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_success, print_warning,
};

/// Outcome of the mutual information stage
enum MiOutcome {
    Disabled,
    Skipped(String),
    Computed(Vec<MutualInformationRecord>),
}

fn main() -> Result<()> {
    // Logs go to stderr so report output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "featdiag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Configuration::from_cli(&cli)?;

    if !cli.quiet {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(&config);
    }

    std::fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            cli.output_dir.display()
        )
    })?;
    let paths = ReportPaths::in_dir(&cli.output_dir);

    // Step 1: Single streaming pass over the samples
    print_step_header(1, "Sample Aggregation");
    let step_start = Instant::now();
    let snapshot = aggregate_input_with_progress(config.input_file.as_deref(), &config.group_tags)?;
    tracing::info!(
        rows = snapshot.row_count(),
        positive = snapshot.positive_count(),
        negative = snapshot.negative_count(),
        features = snapshot.feature_count(),
        elapsed_ms = step_start.elapsed().as_millis() as u64,
        "aggregation finished"
    );

    // Step 2: Summary and coverage reports
    print_step_header(2, "Summary & Coverage");
    let spinner = create_spinner("Writing summary and coverage reports...");
    let summary = SampleSummary::from_snapshot(&snapshot)?;
    summary.write(&paths.summary)?;

    let thresholds = &config.thresholds;
    let coverage = partition_coverage(&snapshot, thresholds.cover_max, thresholds.cover_min)?;
    coverage.write(&paths)?;
    finish_with_success(
        &spinner,
        &format!("Summary written to {}", paths.summary.display()),
    );
    print_count("feature(s) listed in", coverage.all.len(), Some(COVERAGE_FILE));
    match (&coverage.more, thresholds.cover_max) {
        (Some(more), Some(max)) => print_count(
            "feature(s) with high coverage",
            more.len(),
            Some(&format!("(>{:.1}%)", max * 100.0)),
        ),
        _ => print_info("cover_max unset - skipping high coverage report"),
    }
    match (&coverage.less, thresholds.cover_min) {
        (Some(less), Some(min)) => print_count(
            "feature(s) with low coverage",
            less.len(),
            Some(&format!("(<{:.1}%)", min * 100.0)),
        ),
        _ => print_info("cover_min unset - skipping low coverage report"),
    }

    // Step 3: Mutual information
    let mi_outcome = if config.enable_mi {
        print_step_header(3, "Mutual Information");
        run_mutual_information(&snapshot, &config, &cli, &paths)?
    } else {
        MiOutcome::Disabled
    };

    if cli.export_json {
        let mutual_information = match &mi_outcome {
            MiOutcome::Disabled => MutualInformationExport::Disabled,
            MiOutcome::Skipped(reason) => MutualInformationExport::Skipped {
                reason: reason.clone(),
            },
            MiOutcome::Computed(ranked) => MutualInformationExport::Computed { features: ranked },
        };
        let export = DiagnosisExport::new(&config, &summary, &coverage, mutual_information);
        export_diagnosis(&export, &paths.export)?;
        print_success(&format!("Diagnosis exported to {}", paths.export.display()));
    }

    if !cli.quiet {
        summary.display();
        print_completion();
    }

    Ok(())
}

/// Rank features and write the high/low reports.
///
/// A degenerate label distribution only skips this stage.
fn run_mutual_information(
    snapshot: &IndexSnapshot,
    config: &Configuration,
    cli: &Cli,
    paths: &ReportPaths,
) -> Result<MiOutcome> {
    let options = cli.workers.map_or_else(MiOptions::default, MiOptions::with_workers);

    let ranked = match compute_mutual_information(snapshot, &options) {
        Ok(ranked) => ranked,
        Err(err @ DiagnoseError::DegenerateLabels { .. }) => {
            tracing::warn!(error = %err, "skipping mutual information stage");
            print_warning(&err.to_string());
            return Ok(MiOutcome::Skipped(err.to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    let thresholds = &config.thresholds;
    let partition = partition_by_rank(
        &ranked,
        snapshot.row_count(),
        thresholds.mutual_max,
        thresholds.mutual_tail_fraction(),
    );
    write_mutual_reports(&partition, &paths.mutual_more, &paths.mutual_less)?;

    match &partition.more {
        Some(more) => print_count("feature(s) with high mutual information", more.len(), None),
        None => print_info("mutual_max unset - skipping high mutual information report"),
    }
    match &partition.less {
        Some(less) => print_count("feature(s) with low mutual information", less.len(), None),
        None => print_info("mutual_min and mutual_max unset - skipping low mutual information report"),
    }
    tracing::info!(
        ranked = ranked.len(),
        more = partition.more.as_ref().map_or(0, Vec::len),
        less = partition.less.as_ref().map_or(0, Vec::len),
        "mutual information partitioned"
    );

    Ok(MiOutcome::Computed(ranked))
}
