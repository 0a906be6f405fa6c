//! Storage layer for the expense tracker
//!
//! Reads and writes the line-oriented expense data file. Writes are atomic;
//! corrupt lines found while loading are skipped and counted, never fatal.

pub mod file_io;
pub mod records;

pub use file_io::{write_json_atomic, write_lines_atomic};
pub use records::{decode_line, encode_line, LineError};

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::models::Expense;

/// Outcome of loading the data file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Whether the data file existed
    pub file_found: bool,
    /// Records accepted
    pub loaded: usize,
    /// Non-blank lines that could not be used
    pub skipped: usize,
}

impl LoadReport {
    /// Message shown to the user after loading
    pub fn message(&self) -> String {
        if !self.file_found {
            return "Starting with an empty expense list (no existing file found).".to_string();
        }
        let mut message = format!("Loaded {} expenses from file", self.loaded);
        if self.skipped > 0 {
            message.push_str(&format!(" ({} corrupted entries skipped)", self.skipped));
        }
        message.push('.');
        message
    }
}

/// Repository for the expense data file
#[derive(Debug, Clone)]
pub struct ExpenseFile {
    path: PathBuf,
}

impl ExpenseFile {
    /// Create a repository for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load every usable record in file order
    ///
    /// A missing file is an empty ledger. Lines that are not valid UTF-8, fail
    /// to decode, or repeat an identifier already seen are skipped and counted.
    pub fn load(&self) -> Result<(Vec<Expense>, LoadReport), LedgerError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No data file yet");
                return Ok((Vec::new(), LoadReport::default()));
            }
            Err(e) => {
                return Err(LedgerError::Persistence(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut report = LoadReport {
            file_found: true,
            ..LoadReport::default()
        };
        let mut expenses = Vec::new();
        let mut seen = HashSet::new();

        for (number, bytes) in content.split(|&b| b == b'\n').enumerate() {
            let line = match std::str::from_utf8(bytes) {
                Ok(line) => line,
                Err(e) => {
                    warn!(line = number + 1, error = %e, "Skipping line that is not valid UTF-8");
                    report.skipped += 1;
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match decode_line(line) {
                Ok(expense) if seen.insert(expense.id) => {
                    expenses.push(expense);
                    report.loaded += 1;
                }
                Ok(expense) => {
                    warn!(line = number + 1, id = %expense.id, "Skipping duplicate expense id");
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!(line = number + 1, error = %e, "Skipping corrupted line");
                    report.skipped += 1;
                }
            }
        }

        debug!(
            path = %self.path.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "Loaded expense file"
        );
        Ok((expenses, report))
    }

    /// Overwrite the file with the given records
    pub fn save(&self, expenses: &[Expense]) -> Result<(), LedgerError> {
        write_lines_atomic(&self.path, expenses.iter().map(encode_line))?;
        debug!(path = %self.path.display(), count = expenses.len(), "Saved expense file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, Money, NewExpense};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn expense(id: u64, desc: &str) -> Expense {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let input = NewExpense::new(desc, Money::from_cents(1250), "Food").date(day);
        Expense::from_input(ExpenseId::new(id), input, day).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let file = ExpenseFile::new(temp_dir.path().join("expenses.txt"));

        let (expenses, report) = file.load().unwrap();
        assert!(expenses.is_empty());
        assert!(!report.file_found);
        assert!(report.message().contains("no existing file"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = ExpenseFile::new(temp_dir.path().join("expenses.txt"));
        let records = vec![expense(1, "Lunch"), expense(4, "Dinner")];

        file.save(&records).unwrap();
        let (loaded, report) = file.load().unwrap();
        assert_eq!(loaded, records);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.message(), "Loaded 2 expenses from file.");
    }

    #[test]
    fn test_corrupt_lines_are_skipped_and_counted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.txt");
        fs::write(
            &path,
            "1|Lunch|12.50|Food|2024-03-15||0|Cash|\n\
             abc|Broken|1.00|Food|2024-03-15\n\
             \n\
             2|Bus|2.50|Transport|2024-03-16\n\
             garbage\n\
             1|Again|3.00|Food|2024-03-17\n",
        )
        .unwrap();

        let (loaded, report) = ExpenseFile::new(&path).load().unwrap();
        let ids: Vec<_> = loaded.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 3);
        assert_eq!(
            report.message(),
            "Loaded 2 expenses from file (3 corrupted entries skipped)."
        );
    }

    #[test]
    fn test_line_with_invalid_utf8_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.txt");
        let mut content = b"1|Lunch|12.50|Food|2024-03-15||0|Cash|\n".to_vec();
        // "Caf\xe9" as written by a Latin-1 editor
        content.extend_from_slice(b"2|Caf\xe9|3.00|Food|2024-03-16||0|Cash|\r\n");
        content.extend_from_slice(b"3|Tea|2.00|Food|2024-03-17");
        fs::write(&path, content).unwrap();

        let (loaded, report) = ExpenseFile::new(&path).load().unwrap();
        let ids: Vec<_> = loaded.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_save_to_unwritable_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        // A plain file sits where the parent directory should be created
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let file = ExpenseFile::new(blocker.join("expenses.txt"));

        let err = file.save(&[expense(1, "Lunch")]).unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));
    }
}
