// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Loads historical student rows from a delimited text file
// (the UCI student-performance layout: one row per student,
// semicolon- or comma-separated, values optionally quoted).
//
// Only four columns matter; everything else is ignored:
//
//   G1, G2, G3   period grades (G3 is also the final grade)
//   absences     absence count
//
// Any missing column, unparsable cell or grade outside [0, 20]
// is a DataFormat error naming the line, so a broken file never
// reaches the fit. Delimiters inside quoted cells are data.

use std::{fs, path::PathBuf};

use crate::domain::error::OutcomeError;
use crate::domain::record::{HistoricalRecord, MAX_GRADE};
use crate::domain::traits::DatasetSource;

const GRADE_COLUMNS: [&str; 3] = ["G1", "G2", "G3"];
const ABSENCES_COLUMN: &str = "absences";

/// Reads a delimited dataset file from disk.
/// Implements the DatasetSource trait from Layer 3.
pub struct CsvDatasetLoader {
    path: PathBuf,
}

impl CsvDatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for CsvDatasetLoader {
    fn load_rows(&self) -> Result<Vec<HistoricalRecord>, OutcomeError> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            OutcomeError::DataFormat(format!("cannot read '{}': {e}", self.path.display()))
        })?;

        let rows = parse_rows(&text)?;
        tracing::info!("Loaded {} rows from '{}'", rows.len(), self.path.display());
        Ok(rows)
    }
}

/// Parse dataset text (header line first) into historical rows.
pub fn parse_rows(text: &str) -> Result<Vec<HistoricalRecord>, OutcomeError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| OutcomeError::DataFormat("dataset is empty".into()))?;

    let delimiter = detect_delimiter(header);
    let columns   = split_fields(header, delimiter);

    let column_index = |name: &str| {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| OutcomeError::DataFormat(format!("missing required column '{name}'")))
    };

    let grade_idx = [
        column_index(GRADE_COLUMNS[0])?,
        column_index(GRADE_COLUMNS[1])?,
        column_index(GRADE_COLUMNS[2])?,
    ];
    let absences_idx = column_index(ABSENCES_COLUMN)?;

    let mut rows = Vec::new();
    for (i, line) in lines {
        let line_no = i + 1;
        let fields  = split_fields(line, delimiter);

        let mut grades = [0.0; 3];
        for (slot, (&idx, name)) in grades.iter_mut().zip(grade_idx.iter().zip(GRADE_COLUMNS)) {
            let grade = cell(&fields, idx, name, line_no)?
                .parse::<f64>()
                .map_err(|e| bad_cell(name, line_no, e))?;
            if !grade.is_finite() || !(0.0..=MAX_GRADE).contains(&grade) {
                return Err(bad_cell(name, line_no, format!("{grade} is outside [0, {MAX_GRADE}]")));
            }
            *slot = grade;
        }

        let absences = cell(&fields, absences_idx, ABSENCES_COLUMN, line_no)?
            .parse::<u32>()
            .map_err(|e| bad_cell(ABSENCES_COLUMN, line_no, e))?;

        rows.push(HistoricalRecord { grades, absences });
    }

    Ok(rows)
}

/// Semicolon if the header contains one, comma otherwise
fn detect_delimiter(header: &str) -> char {
    if header.contains(';') { ';' } else { ',' }
}

/// Split one line on `delimiter`, honouring double quotes.
/// A doubled quote inside a quoted cell is a literal quote.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields    = Vec::new();
    let mut current   = String::new();
    let mut in_quotes = false;
    let mut chars     = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn cell<'a>(fields: &'a [String], idx: usize, name: &str, line_no: usize) -> Result<&'a str, OutcomeError> {
    fields.get(idx).map(String::as_str).ok_or_else(|| {
        OutcomeError::DataFormat(format!("line {line_no}: missing value for '{name}'"))
    })
}

fn bad_cell(name: &str, line_no: usize, err: impl std::fmt::Display) -> OutcomeError {
    OutcomeError::DataFormat(format!("line {line_no}: bad value for '{name}': {err}"))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semicolon_quoted_header() {
        let text = "school;\"absences\";\"G1\";\"G2\";\"G3\"\n\"GP\";4;\"10\";\"11\";\"12\"\n";
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows, vec![HistoricalRecord { grades: [10.0, 11.0, 12.0], absences: 4 }]);
    }

    #[test]
    fn test_comma_delimited_any_column_order() {
        let text = "G3,G2,absences,G1,age\n15,14,0,13,17\n8,9,12,7,16\n";
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].grades, [13.0, 14.0, 15.0]);
        assert_eq!(rows[1].absences, 12);
        assert_eq!(rows[1].final_grade(), 8.0);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = "G1;G2;G3;absences\n\n10;10;10;1\n\n";
        assert_eq!(parse_rows(text).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_column() {
        let text = "G1;G2;absences\n10;10;1\n";
        match parse_rows(text) {
            Err(OutcomeError::DataFormat(msg)) => assert!(msg.contains("G3")),
            other => panic!("expected DataFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_cell_reports_line() {
        let text = "G1;G2;G3;absences\n10;10;10;1\n10;x;10;1\n";
        match parse_rows(text) {
            Err(OutcomeError::DataFormat(msg)) => {
                assert!(msg.contains("line 3"), "{msg}");
                assert!(msg.contains("G2"), "{msg}");
            }
            other => panic!("expected DataFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_quoted_delimiter_does_not_shift_columns() {
        let text = "school;reason;absences;G1;G2;G3\n\"GP\";\"home;course\";4;10;11;12\n\"GP\";\"a;7\";4;10;11;12\n";
        let rows = parse_rows(text).unwrap();
        for r in &rows {
            assert_eq!(*r, HistoricalRecord { grades: [10.0, 11.0, 12.0], absences: 4 });
        }
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_split_fields_handles_escaped_quotes() {
        assert_eq!(split_fields(r#""say ""hi"", ok",3"#, ','), vec![r#"say "hi", ok"#, "3"]);
        assert_eq!(split_fields("a;;b", ';'), vec!["a", "", "b"]);
    }

    #[test]
    fn test_non_finite_or_out_of_range_grades_rejected() {
        for bad in ["NaN", "inf", "-3", "25"] {
            let text = format!("G1;G2;G3;absences\n10;10;10;1\n{bad};10;10;1\n");
            match parse_rows(&text) {
                Err(OutcomeError::DataFormat(msg)) => {
                    assert!(msg.contains("line 3"), "{msg}");
                    assert!(msg.contains("G1"), "{msg}");
                }
                other => panic!("{bad} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn test_short_row() {
        let text = "G1;G2;G3;absences\n10;10\n";
        assert!(matches!(parse_rows(text), Err(OutcomeError::DataFormat(_))));
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse_rows(""), Err(OutcomeError::DataFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let loader = CsvDatasetLoader::new("/definitely/not/here.csv");
        assert!(matches!(loader.load_rows(), Err(OutcomeError::DataFormat(_))));
    }
}
