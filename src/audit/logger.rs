//! Append-only audit trail of ledger changes
//!
//! One JSON object per line. A line that cannot be read back is skipped with
//! a warning, the same way the data file treats corrupt records, so a damaged
//! trail never hides the entries around it.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{LedgerError, LedgerResult};
use crate::models::ExpenseId;

use super::entry::AuditEntry;

/// Writes and reads the JSONL audit trail
#[derive(Debug, Clone)]
pub struct AuditLogger {
    path: PathBuf,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry
    ///
    /// Failures are `Persistence` errors. The change being audited has
    /// already happened and stays in effect.
    pub fn log(&self, entry: &AuditEntry) -> LedgerResult<()> {
        let line = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.persistence("open", e))?;

        writeln!(file, "{}", line)
            .and_then(|()| file.flush())
            .map_err(|e| self.persistence("write to", e))
    }

    /// Every readable entry, oldest first
    pub fn read_all(&self) -> LedgerResult<Vec<AuditEntry>> {
        let mut entries = Vec::new();
        self.scan(|entry| entries.push(entry))?;
        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> LedgerResult<Vec<AuditEntry>> {
        let mut recent = VecDeque::with_capacity(count);
        self.scan(|entry| {
            recent.push_back(entry);
            if recent.len() > count {
                recent.pop_front();
            }
        })?;
        Ok(recent.into())
    }

    /// Entries naming one expense, oldest first
    ///
    /// Clear, undo and redo entries name no expense and are never included.
    pub fn read_for_expense(&self, id: ExpenseId) -> LedgerResult<Vec<AuditEntry>> {
        let key = id.to_string();
        let mut entries = Vec::new();
        self.scan(|entry| {
            if entry.entity_id.as_deref() == Some(key.as_str()) {
                entries.push(entry);
            }
        })?;
        Ok(entries)
    }

    fn scan(&self, mut visit: impl FnMut(AuditEntry)) -> LedgerResult<()> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(self.persistence("read", e)),
        };

        for (number, line) in content.split(|&b| b == b'\n').enumerate() {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice::<AuditEntry>(line) {
                Ok(entry) => visit(entry),
                Err(e) => warn!(line = number + 1, error = %e, "Skipping unreadable audit entry"),
            }
        }
        Ok(())
    }

    fn persistence(&self, action: &str, e: io::Error) -> LedgerError {
        LedgerError::Persistence(format!(
            "Failed to {} audit log {}: {}",
            action,
            self.path.display(),
            e
        ))
    }
}
