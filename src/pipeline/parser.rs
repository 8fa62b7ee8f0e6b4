//! Sample row parsing
//!
//! One line is `label<TAB>feature[:value]<TAB>...`. Only the identifier
//! before the first colon is kept; values are ignored.

use super::error::{DiagnoseError, DiagnoseResult};

/// Label string that marks a negative sample. Anything else is positive.
pub const NEGATIVE_LABEL: &str = "-1";

/// Binary sample label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// Interpret a raw label field. Only the exact string `-1` is negative.
    pub fn from_field(field: &str) -> Self {
        if field == NEGATIVE_LABEL {
            Label::Negative
        } else {
            Label::Positive
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Label::Positive)
    }
}

/// A single parsed sample, borrowing its feature identifiers from the line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRow<'a> {
    pub label: Label,
    pub features: Vec<&'a str>,
}

impl SampleRow<'_> {
    /// Number of feature tokens in the row
    pub fn width(&self) -> usize {
        self.features.len()
    }
}

/// Parse one input line.
///
/// # Arguments
/// * `line` - Raw line, surrounding whitespace is trimmed first
/// * `line_number` - 1-based position in the stream, used for error reporting
pub fn parse_row(line: &str, line_number: u64) -> DiagnoseResult<SampleRow<'_>> {
    let trimmed = line.trim();
    let mut fields = trimmed.split('\t');

    // split always yields at least one item
    let label = Label::from_field(fields.next().unwrap_or_default());

    let features: Vec<&str> = fields.map(feature_identifier).collect();

    if features.is_empty() {
        return Err(DiagnoseError::MalformedRow {
            line: line_number,
            content: trimmed.to_string(),
        });
    }

    Ok(SampleRow { label, features })
}

/// Strip the `:value` suffix from a feature token
fn feature_identifier(token: &str) -> &str {
    token.split_once(':').map_or(token, |(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_row_strips_values() {
        let row = parse_row("+1\tage:30\tcity:paris\tflag\n", 1).unwrap();
        assert_eq!(row.label, Label::Positive);
        assert_eq!(row.features, vec!["age", "city", "flag"]);
        assert_eq!(row.width(), 3);
    }

    #[test]
    fn test_only_minus_one_is_negative() {
        assert_eq!(parse_row("-1\tA", 1).unwrap().label, Label::Negative);
        assert_eq!(parse_row("0\tA", 1).unwrap().label, Label::Positive);
        assert_eq!(parse_row("-1.0\tA", 1).unwrap().label, Label::Positive);
        assert_eq!(parse_row("abc\tA", 1).unwrap().label, Label::Positive);
    }

    #[test]
    fn test_value_with_extra_colons() {
        let row = parse_row("1\turl:http://x:80", 1).unwrap();
        assert_eq!(row.features, vec!["url"]);
    }

    #[test]
    fn test_label_only_is_malformed() {
        let err = parse_row("+1\n", 7).unwrap_err();
        match err {
            DiagnoseError::MalformedRow { line, content } => {
                assert_eq!(line, 7);
                assert_eq!(content, "+1");
            }
            other => panic!("Expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_line_is_malformed() {
        assert!(matches!(
            parse_row("   \n", 3),
            Err(DiagnoseError::MalformedRow { line: 3, .. })
        ));
    }

    #[test]
    fn test_space_separated_is_malformed() {
        // Fields must be tab-delimited
        assert!(parse_row("+1 A B", 1).is_err());
    }
}
