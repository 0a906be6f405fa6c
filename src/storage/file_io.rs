//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::LedgerError;

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), |writer| {
        serde_json::to_writer_pretty(&mut *writer, data)
            .map_err(|e| LedgerError::Persistence(format!("Failed to serialize data: {}", e)))?;
        writer
            .write_all(b"\n")
            .map_err(|e| LedgerError::Persistence(format!("Failed to write data: {}", e)))
    })
}

/// Write lines of text to a file atomically, one newline after each line
pub fn write_lines_atomic<P, I, S>(path: P, lines: I) -> Result<(), LedgerError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    write_atomic(path.as_ref(), |writer| {
        for line in lines {
            writer
                .write_all(line.as_ref().as_bytes())
                .and_then(|_| writer.write_all(b"\n"))
                .map_err(|e| LedgerError::Persistence(format!("Failed to write data: {}", e)))?;
        }
        Ok(())
    })
}

/// Write through a temp file in the same directory, then rename over `path`
///
/// The target is either completely written or not modified at all.
fn write_atomic<F>(path: &Path, write: F) -> Result<(), LedgerError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), LedgerError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Persistence(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| LedgerError::Persistence(format!("Failed to create temp file: {}", e)))?;
    let mut writer = BufWriter::new(file);

    let written = write(&mut writer).and_then(|_| {
        writer
            .flush()
            .map_err(|e| LedgerError::Persistence(format!("Failed to flush data: {}", e)))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| LedgerError::Persistence(format!("Failed to sync data: {}", e)))
    });
    drop(writer);

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LedgerError::Persistence(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// `expenses.txt` -> `expenses.txt.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("data"));
    name.push(".tmp");
    path.with_file_name(name)
}
