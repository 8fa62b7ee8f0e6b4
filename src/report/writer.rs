//! Tab-separated report files and their names

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::pipeline::{DiagnoseError, DiagnoseResult};

pub const SUMMARY_FILE: &str = "sample.summary.txt";
pub const COVERAGE_FILE: &str = "feature.coverage.txt";
pub const COVERAGE_MORE_FILE: &str = "feature.coverage.more.txt";
pub const COVERAGE_LESS_FILE: &str = "feature.coverage.less.txt";
pub const MUTUAL_MORE_FILE: &str = "feature.mi.more.txt";
pub const MUTUAL_LESS_FILE: &str = "feature.mi.less.txt";
pub const EXPORT_FILE: &str = "diagnosis.json";

/// Locations of every report produced by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub summary: PathBuf,
    pub coverage: PathBuf,
    pub coverage_more: PathBuf,
    pub coverage_less: PathBuf,
    pub mutual_more: PathBuf,
    pub mutual_less: PathBuf,
    pub export: PathBuf,
}

impl ReportPaths {
    /// Standard report names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            summary: dir.join(SUMMARY_FILE),
            coverage: dir.join(COVERAGE_FILE),
            coverage_more: dir.join(COVERAGE_MORE_FILE),
            coverage_less: dir.join(COVERAGE_LESS_FILE),
            mutual_more: dir.join(MUTUAL_MORE_FILE),
            mutual_less: dir.join(MUTUAL_LESS_FILE),
            export: dir.join(EXPORT_FILE),
        }
    }
}

/// Write `name<TAB>value` lines to `path`, replacing any existing file
pub fn write_records<I, K, V>(path: &Path, records: I) -> DiagnoseResult<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: Display,
    V: Display,
{
    let file = File::create(path).map_err(|e| DiagnoseError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for (name, value) in records {
        writeln!(writer, "{}\t{}", name, value).map_err(|e| DiagnoseError::io(path, e))?;
    }
    writer.flush().map_err(|e| DiagnoseError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_records_tab_separated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        write_records(&path, vec![("a", 1), ("b", 2)]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "a\t1\nb\t2\n");
    }

    #[test]
    fn test_write_records_unwritable_path() {
        let err = write_records(Path::new("/no/such/dir/out.txt"), vec![("a", 1)]).unwrap_err();
        assert!(matches!(err, DiagnoseError::Io { .. }));
    }

    #[test]
    fn test_report_paths_in_dir() {
        let paths = ReportPaths::in_dir(Path::new("/tmp/run"));
        assert_eq!(paths.summary, PathBuf::from("/tmp/run/sample.summary.txt"));
        assert_eq!(paths.coverage, PathBuf::from("/tmp/run/feature.coverage.txt"));
        assert_eq!(paths.mutual_less, PathBuf::from("/tmp/run/feature.mi.less.txt"));
    }
}
