//! Tests for CLI argument parsing and the featdiag binary

use assert_cmd::Command;
use clap::Parser;
use featdiag::cli::Cli;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["featdiag"]);

    assert!(cli.input.is_none(), "Default input should be stdin");
    assert_eq!(cli.cover_max, -1.0, "Thresholds default to the unset sentinel");
    assert_eq!(cli.mutual_min, -1.0);
    assert!(!cli.enable_mi, "Mutual information is off by default");
    assert!(cli.group_tags().is_empty());
    assert_eq!(cli.output_dir, PathBuf::from("."));
    assert_eq!(cli.config_path(), (PathBuf::from("thresholds.json"), false));
}

#[test]
fn test_cli_custom_thresholds() {
    let cli = Cli::parse_from([
        "featdiag",
        "samples.txt",
        "--cover-max",
        "0.9",
        "--cover-min",
        "0.01",
        "--mutual-max",
        "0.1",
        "--enable-mi",
        "-c",
        "my.json",
    ]);

    assert_eq!(cli.input, Some(PathBuf::from("samples.txt")));
    assert_eq!(cli.cover_max, 0.9);
    assert_eq!(cli.cover_min, 0.01);
    assert_eq!(cli.mutual_max, 0.1);
    assert!(cli.enable_mi);
    assert_eq!(cli.config_path(), (PathBuf::from("my.json"), true));
}

#[test]
fn test_cli_rejects_threshold_above_one() {
    let result = Cli::try_parse_from(["featdiag", "--cover-max", "1.5"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_workers_bounds() {
    let cli = Cli::parse_from(["featdiag", "--workers", "8"]);
    assert_eq!(cli.workers, Some(8));

    assert!(Cli::try_parse_from(["featdiag", "--workers", "0"]).is_err());
    assert!(Cli::try_parse_from(["featdiag", "--workers", "18446744073709551615"]).is_err());
}

#[test]
fn test_cli_group_tags_trimmed_and_deduplicated() {
    let cli = Cli::parse_from(["featdiag", "--group-tag", "user, \"item\",,user,ad "]);
    assert_eq!(cli.group_tags(), vec!["user", "item", "ad"]);
}

fn featdiag_in(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("featdiag").unwrap();
    cmd.current_dir(dir.path()).env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_binary_writes_reports_from_stdin() {
    let dir = TempDir::new().unwrap();

    featdiag_in(&dir)
        .args(["--quiet", "--cover-max", "0.5", "--cover-min", "0.4"])
        .write_stdin(SMALL_SAMPLES)
        .assert()
        .success();

    let summary = read_report(&dir.path().join("sample.summary.txt"));
    assert_eq!(report_value(&summary, "rows"), "3");
    assert_eq!(report_value(&summary, "positive"), "2");

    let more = read_report(&dir.path().join("feature.coverage.more.txt"));
    assert_eq!(more.len(), 2);
    let less = read_report(&dir.path().join("feature.coverage.less.txt"));
    assert_eq!(less, vec![("C".to_string(), "1".to_string())]);

    let listing = read_report(&dir.path().join("feature.coverage.txt"));
    assert_eq!(listing.len(), 3);
    assert_eq!(listing[2], ("C".to_string(), "1".to_string()));

    assert!(!dir.path().join("feature.mi.more.txt").exists());
}

#[test]
fn test_binary_mutual_information_with_config_file() {
    let dir = TempDir::new().unwrap();
    let samples = dir.path().join("samples.txt");
    std::fs::write(&samples, SIGNAL_SAMPLES).unwrap();
    std::fs::write(
        dir.path().join("thresholds.json"),
        r#"{"mutual_max": 0.25, "mutual_min": 0.5, "cover_max": -1}"#,
    )
    .unwrap();

    featdiag_in(&dir)
        .args(["--quiet", "--enable-mi", "--export-json", "--workers", "2", "-o", "out"])
        .arg(&samples)
        .assert()
        .success();

    let out = dir.path().join("out");
    let more = read_report(&out.join("feature.mi.more.txt"));
    assert_eq!(more, vec![("signal".to_string(), "6931.4718".to_string())]);

    let less = read_report(&out.join("feature.mi.less.txt"));
    assert_eq!(less.last().unwrap().0, "noise");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("diagnosis.json")).unwrap())
            .unwrap();
    assert_eq!(json["summary"]["rows"], 4);
    assert_eq!(json["mutual_information"]["status"], "computed");
    assert_eq!(json["mutual_information"]["features"][0]["feature"], "signal");
}

#[test]
fn test_binary_degenerate_labels_keeps_summary() {
    let dir = TempDir::new().unwrap();

    featdiag_in(&dir)
        .args(["--quiet", "--enable-mi", "--mutual-max", "0.5"])
        .write_stdin(ALL_POSITIVE_SAMPLES)
        .assert()
        .success()
        .stdout(predicate::str::contains("mutual information is undefined"));

    let summary = read_report(&dir.path().join("sample.summary.txt"));
    assert_eq!(report_value(&summary, "negative"), "0");
    assert!(!dir.path().join("feature.mi.more.txt").exists());
}

#[test]
fn test_binary_malformed_row_is_fatal() {
    let dir = TempDir::new().unwrap();

    featdiag_in(&dir)
        .arg("--quiet")
        .write_stdin("+1\tA\n-1\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed sample on line 2"));

    assert!(!dir.path().join("sample.summary.txt").exists());
}

#[test]
fn test_binary_empty_input_is_fatal() {
    let dir = TempDir::new().unwrap();

    featdiag_in(&dir)
        .arg("--quiet")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no samples"));
}

#[test]
fn test_binary_missing_input_file_is_fatal() {
    let dir = TempDir::new().unwrap();

    featdiag_in(&dir)
        .args(["--quiet", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.txt"));
}

#[test]
fn test_binary_explicit_missing_config_is_fatal() {
    let dir = TempDir::new().unwrap();

    featdiag_in(&dir)
        .args(["--quiet", "--config", "nope.json"])
        .write_stdin(SMALL_SAMPLES)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}
