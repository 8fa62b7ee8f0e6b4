//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;

use featdiag::pipeline::{aggregate_stream, IndexSnapshot};
use tempfile::TempDir;

/// The three-row scenario used across tests:
/// - rows: 3 (2 positive, 1 negative)
/// - coverage: A=2, B=2, C=1
/// - widths: min 1, max 2
pub const SMALL_SAMPLES: &str = "+1\tA\tB\n-1\tA\n+1\tB\tC\n";

/// Samples where `signal` appears exactly in the positive rows and
/// `noise` in half of each class
pub const SIGNAL_SAMPLES: &str = "\
+1\tsignal\tnoise\tuser_a
+1\tsignal\tuser_b
-1\tnoise\titem_a
-1\titem_b\tuser_c
";

/// Every row positive
pub const ALL_POSITIVE_SAMPLES: &str = "+1\tA\tB\n1\tA\n+1\tC\n";

/// Aggregate an in-memory sample string
pub fn snapshot_of(samples: &str, tags: &[&str]) -> IndexSnapshot {
    let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    aggregate_stream(Cursor::new(samples), &tags).unwrap()
}

/// Generate `rows` random samples with feature widths in `1..=max_width`.
/// Returns the samples and the width of each row.
pub fn random_samples(rows: usize, max_width: usize, vocabulary: usize) -> (String, Vec<usize>) {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let mut samples = String::new();
    let mut widths = Vec::with_capacity(rows);
    for _ in 0..rows {
        let label = if rng.gen_bool(0.4) { "-1" } else { "+1" };
        let width = rng.gen_range(1..=max_width);
        samples.push_str(label);
        for _ in 0..width {
            let feature = rng.gen_range(0..vocabulary);
            samples.push_str(&format!("\tf{}:{}", feature, rng.gen::<u8>()));
        }
        samples.push('\n');
        widths.push(width);
    }
    (samples, widths)
}

/// Create a temporary directory with a sample file
pub fn create_temp_samples(samples: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("samples.txt");
    std::fs::write(&path, samples).unwrap();
    (temp_dir, path)
}

/// Read a `name<TAB>value` report into pairs
pub fn read_report(path: &std::path::Path) -> Vec<(String, String)> {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read report {}: {}", path.display(), e))
        .lines()
        .map(|line| {
            let (name, value) = line
                .split_once('\t')
                .unwrap_or_else(|| panic!("Report line is not tab-separated: {:?}", line));
            (name.to_string(), value.to_string())
        })
        .collect()
}

/// Look up one value in a report
pub fn report_value(report: &[(String, String)], name: &str) -> String {
    report
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.clone())
        .unwrap_or_else(|| panic!("Report has no entry '{}'", name))
}
