//! Roster import.
//!
//! Format: one header row, then `categoryA,categoryB,first,last,email`
//! per individual. Import is lenient: blank lines are ignored and short
//! rows are skipped with a warning.

use std::path::Path;

use grademix_core::Individual;
use tracing::{info, warn};

use crate::error::RosterResult;
use crate::record::{Record, read_records};

const ROSTER_FIELDS: usize = 5;

/// Individuals parsed from a roster, plus the line numbers that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterImport {
    pub individuals: Vec<Individual>,
    /// One-based line numbers of rows with too few fields.
    pub skipped: Vec<usize>,
}

/// Parse roster text. The first non-blank record is treated as the header.
pub fn parse_roster(text: &str) -> RosterImport {
    let mut import = RosterImport::default();

    let mut records = read_records(text).into_iter();
    // Header.
    records.next();

    for Record { line, fields } in records {
        if fields.len() < ROSTER_FIELDS {
            warn!(line, fields = fields.len(), "skipping short roster row");
            import.skipped.push(line);
            continue;
        }
        import.individuals.push(Individual {
            category_a: fields[0].clone(),
            category_b: fields[1].to_lowercase(),
            first_name: fields[2].clone(),
            last_name: fields[3].clone(),
            email: fields[4].clone(),
        });
    }

    import
}

/// Read and parse a roster file.
pub fn read_roster(path: &Path) -> RosterResult<RosterImport> {
    let text = std::fs::read_to_string(path)?;
    let import = parse_roster(&text);
    info!(
        ?path,
        individuals = import.individuals.len(),
        skipped = import.skipped.len(),
        "roster imported"
    );
    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
grade,gender,first,last,email
9,M,Ada,Lovelace,ada@school.test

10,f,Grace,Hopper,grace@school.test
11,m,short
12,F,\"Katherine, K.\",Johnson,kj@school.test
";

    #[test]
    fn parses_rows_after_header() {
        let import = parse_roster(ROSTER);
        assert_eq!(import.individuals.len(), 3);

        let ada = &import.individuals[0];
        assert_eq!(ada.first_name, "Ada");
        assert_eq!(ada.category_a, "9");
        assert_eq!(ada.category_b, "m");
        assert_eq!(ada.email, "ada@school.test");
    }

    #[test]
    fn short_rows_are_skipped_with_line_numbers() {
        let import = parse_roster(ROSTER);
        assert_eq!(import.skipped, vec![5]);
    }

    #[test]
    fn quoted_names_are_kept_whole() {
        let import = parse_roster(ROSTER);
        assert_eq!(import.individuals[2].first_name, "Katherine, K.");
        assert_eq!(import.individuals[2].category_b, "f");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(parse_roster(""), RosterImport::default());
        assert_eq!(parse_roster("grade,gender,first,last,email\n"), RosterImport::default());
    }

    #[test]
    fn read_roster_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        std::fs::write(&path, ROSTER).unwrap();

        let import = read_roster(&path).unwrap();
        assert_eq!(import.individuals.len(), 3);
    }

    #[test]
    fn read_roster_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_roster(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, crate::RosterError::Io(_)));
    }
}
