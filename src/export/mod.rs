//! Export module for the expense tracker
//!
//! Provides data export in two formats:
//! - CSV: spreadsheet-compatible, one row per expense
//! - JSON: machine-readable full export with metadata

pub mod csv;
pub mod json;

pub use self::csv::{export_expenses_csv, CSV_HEADER};
pub use self::json::{export_full_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Expense;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Append the format's extension unless the path already has it
    pub fn file_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        let has_extension = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case(self.extension()));
        if has_extension {
            path.to_path_buf()
        } else {
            let mut name = path.as_os_str().to_os_string();
            name.push(".");
            name.push(self.extension());
            PathBuf::from(name)
        }
    }
}

/// Write expenses to a file; returns the path actually written
pub fn export_to_file(
    expenses: &[Expense],
    path: impl AsRef<Path>,
    format: ExportFormat,
) -> LedgerResult<PathBuf> {
    let path = format.file_path(path);
    let file = File::create(&path).map_err(|e| {
        LedgerError::Export(format!("Could not create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => export_expenses_csv(expenses, &mut writer)?,
        ExportFormat::Json => export_full_json(expenses, &mut writer, true)?,
    }

    Ok(path)
}
