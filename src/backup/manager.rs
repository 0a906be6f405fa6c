//! Backup manager for the expense tracker
//!
//! Copies the data file to `<file name>.backup.<unix timestamp>`. A backup
//! never replaces an earlier one: if the name is taken, a `-N` counter is
//! appended.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

use crate::error::{LedgerError, LedgerResult};

/// Marker between the data file name and the timestamp
const BACKUP_MARKER: &str = ".backup.";

/// Metadata about a backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created (second precision)
    pub created_at: DateTime<Utc>,
    /// Counter used when several backups share a timestamp
    pub sequence: u32,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Creates and lists backups of one data file
#[derive(Debug, Clone)]
pub struct BackupManager {
    /// The file being backed up
    data_file: PathBuf,
    /// Directory receiving the copies
    backup_dir: PathBuf,
}

impl BackupManager {
    /// Back up `data_file` into `backup_dir`
    pub fn new(data_file: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// Back up `data_file` into the directory that contains it
    pub fn beside(data_file: impl Into<PathBuf>) -> Self {
        let data_file = data_file.into();
        let backup_dir = data_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(data_file, backup_dir)
    }

    /// Create a backup stamped with the current time
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self) -> LedgerResult<PathBuf> {
        self.create_backup_at(Utc::now())
    }

    /// Create a backup stamped with `now`
    pub fn create_backup_at(&self, now: DateTime<Utc>) -> LedgerResult<PathBuf> {
        let mut source = File::open(&self.data_file).map_err(|e| {
            LedgerError::Persistence(format!(
                "Cannot read {} for backup: {}",
                self.data_file.display(),
                e
            ))
        })?;

        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            LedgerError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let base = format!("{}{}{}", self.file_name(), BACKUP_MARKER, now.timestamp());
        let mut sequence = 0u32;
        let (backup_path, mut target) = loop {
            let filename = if sequence == 0 {
                base.clone()
            } else {
                format!("{}-{}", base, sequence)
            };
            let path = self.backup_dir.join(filename);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => sequence += 1,
                Err(e) => {
                    return Err(LedgerError::Io(format!(
                        "Failed to create backup file: {}",
                        e
                    )))
                }
            }
        };

        io::copy(&mut source, &mut target).map_err(|e| {
            let _ = fs::remove_file(&backup_path);
            LedgerError::Io(format!("Failed to write backup file: {}", e))
        })?;

        info!(path = %backup_path.display(), "Created backup");
        Ok(backup_path)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> LedgerResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = format!("{}{}", self.file_name(), BACKUP_MARKER);
        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            LedgerError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                LedgerError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            let path = entry.path();
            let filename = entry.file_name().to_string_lossy().to_string();
            let Some(stamp) = filename.strip_prefix(&prefix) else {
                continue;
            };
            let Some((created_at, sequence)) = parse_backup_stamp(stamp) else {
                continue;
            };
            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);

            backups.push(BackupInfo {
                filename,
                path,
                created_at,
                sequence,
                size_bytes,
            });
        }

        // Sort by date, newest first
        backups.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.sequence.cmp(&a.sequence))
        });

        Ok(backups)
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> LedgerResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    fn file_name(&self) -> String {
        self.data_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "expenses".to_string())
    }
}

/// Parse `<unix seconds>` or `<unix seconds>-<counter>`
fn parse_backup_stamp(stamp: &str) -> Option<(DateTime<Utc>, u32)> {
    let (seconds, sequence) = match stamp.split_once('-') {
        Some((seconds, sequence)) => (seconds, sequence.parse().ok()?),
        None => (stamp, 0),
    };
    if seconds.is_empty() || !seconds.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let created_at = Utc.timestamp_opt(seconds.parse().ok()?, 0).single()?;
    Some((created_at, sequence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let data_file = temp_dir.path().join("expenses.txt");
        fs::write(&data_file, "1|Lunch|12.50|Food|2024-03-15||0|Cash|\n").unwrap();
        (BackupManager::beside(data_file), temp_dir)
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().unwrap()
    }

    #[test]
    fn test_create_backup() {
        let (manager, temp) = create_test_manager();

        let backup_path = manager.create_backup_at(at(1_700_000_000)).unwrap();
        assert_eq!(
            backup_path,
            temp.path().join("expenses.txt.backup.1700000000")
        );
        assert_eq!(
            fs::read_to_string(&backup_path).unwrap(),
            fs::read_to_string(temp.path().join("expenses.txt")).unwrap()
        );
    }

    #[test]
    fn test_backup_never_overwrites() {
        let (manager, temp) = create_test_manager();

        let first = manager.create_backup_at(at(1_700_000_000)).unwrap();
        fs::write(temp.path().join("expenses.txt"), "changed\n").unwrap();
        let second = manager.create_backup_at(at(1_700_000_000)).unwrap();

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with(".backup.1700000000-1"));
        assert!(fs::read_to_string(&first).unwrap().starts_with("1|Lunch"));
        assert_eq!(fs::read_to_string(&second).unwrap(), "changed\n");
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, temp) = create_test_manager();
        fs::write(temp.path().join("unrelated.txt"), "x").unwrap();

        manager.create_backup_at(at(1_700_000_000)).unwrap();
        manager.create_backup_at(at(1_700_000_500)).unwrap();
        manager.create_backup_at(at(1_700_000_500)).unwrap();

        let backups = manager.list_backups().unwrap();
        let names: Vec<_> = backups.iter().map(|b| b.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "expenses.txt.backup.1700000500-1",
                "expenses.txt.backup.1700000500",
                "expenses.txt.backup.1700000000",
            ]
        );
        assert!(backups[0].size_bytes > 0);
    }

    #[test]
    fn test_get_latest_backup() {
        let (manager, _temp) = create_test_manager();
        assert!(manager.get_latest_backup().unwrap().is_none());

        let path = manager.create_backup().unwrap();
        assert_eq!(manager.get_latest_backup().unwrap().unwrap().path, path);
    }

    #[test]
    fn test_backup_without_data_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let manager = BackupManager::beside(temp_dir.path().join("missing.txt"));

        let err = manager.create_backup().unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));
        assert!(manager.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_parse_backup_stamp() {
        let (created_at, sequence) = parse_backup_stamp("1700000000").unwrap();
        assert_eq!(created_at.timestamp(), 1_700_000_000);
        assert_eq!(sequence, 0);

        assert_eq!(parse_backup_stamp("1700000000-3").unwrap().1, 3);
        assert!(parse_backup_stamp("abc").is_none());
        assert!(parse_backup_stamp("").is_none());
    }
}
