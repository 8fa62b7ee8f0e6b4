//! Sample summary report generation

use std::path::Path;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde::Serialize;

use super::writer::write_records;
use crate::pipeline::{DiagnoseError, DiagnoseResult, IndexSnapshot};

/// Share of rows matched by one group tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCoverage {
    pub tag: String,
    pub rows: u64,
    pub ratio: f64,
}

/// Headline statistics of the sample set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    pub rows: u64,
    pub positive: u64,
    pub negative: u64,
    pub features: usize,
    pub min_width: usize,
    pub max_width: usize,
    pub average_width: f64,
    pub groups: Vec<GroupCoverage>,
}

impl SampleSummary {
    /// Summarize a frozen snapshot.
    ///
    /// Fails with `EmptyInput` when no rows were read, since every ratio
    /// would divide by zero.
    pub fn from_snapshot(snapshot: &IndexSnapshot) -> DiagnoseResult<Self> {
        let (Some(min_width), Some(max_width), Some(average_width)) = (
            snapshot.min_width(),
            snapshot.max_width(),
            snapshot.average_width(),
        ) else {
            return Err(DiagnoseError::EmptyInput);
        };

        let rows = snapshot.row_count();
        let groups = snapshot
            .group_coverage()
            .iter()
            .map(|(tag, matches)| GroupCoverage {
                tag: tag.clone(),
                rows: *matches,
                ratio: *matches as f64 / rows as f64,
            })
            .collect();

        Ok(Self {
            rows,
            positive: snapshot.positive_count(),
            negative: snapshot.negative_count(),
            features: snapshot.feature_count(),
            min_width,
            max_width,
            average_width,
            groups,
        })
    }

    /// Report lines in file order
    pub fn records(&self) -> Vec<(String, String)> {
        let mut records = vec![
            ("rows".to_string(), self.rows.to_string()),
            ("positive".to_string(), self.positive.to_string()),
            ("negative".to_string(), self.negative.to_string()),
            ("features".to_string(), self.features.to_string()),
            ("width.max".to_string(), self.max_width.to_string()),
            ("width.min".to_string(), self.min_width.to_string()),
            ("width.avg".to_string(), format!("{:.3}", self.average_width)),
        ];
        records.extend(
            self.groups
                .iter()
                .map(|g| (format!("group.{}", g.tag), format!("{:.4}", g.ratio))),
        );
        records
    }

    /// Write the summary report file
    pub fn write(&self, path: &Path) -> DiagnoseResult<()> {
        write_records(path, self.records())
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("SAMPLE SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Rows"), Cell::new(self.rows)]);
        table.add_row(vec![
            Cell::new("➕ Positive"),
            Cell::new(self.positive).fg(Color::Green),
        ]);
        table.add_row(vec![
            Cell::new("➖ Negative"),
            Cell::new(self.negative).fg(Color::Red),
        ]);
        table.add_row(vec![
            Cell::new("🔢 Distinct Features"),
            Cell::new(self.features).add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("📏 Width (min / avg / max)"),
            Cell::new(format!(
                "{} / {:.3} / {}",
                self.min_width, self.average_width, self.max_width
            )),
        ]);

        for group in &self.groups {
            let color = if group.rows == 0 {
                Color::Yellow
            } else {
                Color::Cyan
            };
            table.add_row(vec![
                Cell::new(format!("🏷️  Group '{}'", group.tag)),
                Cell::new(format!("{:.1}%", group.ratio * 100.0)).fg(color),
            ]);
        }

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::aggregate_stream;
    use std::io::Cursor;

    #[test]
    fn test_summary_records() {
        let tags = vec!["A".to_string(), "Z".to_string()];
        let snapshot =
            aggregate_stream(Cursor::new("+1\tA\tB\n-1\tA\n+1\tB\tC\n"), &tags).unwrap();
        let summary = SampleSummary::from_snapshot(&snapshot).unwrap();

        let records = summary.records();
        let lookup = |name: &str| {
            records
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(lookup("rows"), "3");
        assert_eq!(lookup("positive"), "2");
        assert_eq!(lookup("negative"), "1");
        assert_eq!(lookup("features"), "3");
        assert_eq!(lookup("width.max"), "2");
        assert_eq!(lookup("width.min"), "1");
        assert_eq!(lookup("width.avg"), "1.667");
        assert_eq!(lookup("group.A"), "0.6667");
        assert_eq!(lookup("group.Z"), "0.0000");
    }

    #[test]
    fn test_empty_snapshot_is_empty_input() {
        let snapshot = aggregate_stream(Cursor::new(""), &[]).unwrap();
        assert!(matches!(
            SampleSummary::from_snapshot(&snapshot),
            Err(DiagnoseError::EmptyInput)
        ));
    }
}
