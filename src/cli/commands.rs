//! One-shot command handlers
//!
//! Non-interactive counterparts of the menu actions, called from `main`
//! after clap has parsed the arguments.

use std::path::Path;

use crate::config::{LedgerPaths, Settings};
use crate::display::format_expense_table;
use crate::error::LedgerResult;
use crate::export::ExportFormat;
use crate::models::ExpenseId;
use crate::services::ExpenseService;
use crate::store::SortKey;

/// Print every expense in the given order
pub fn handle_list_command(service: &ExpenseService, sort: SortKey) -> LedgerResult<()> {
    let expenses = service.store().list(sort);
    print!(
        "{}",
        format_expense_table(&expenses, &service.settings().currency_symbol)
    );
    Ok(())
}

/// Print the summary report
pub fn handle_summary_command(service: &ExpenseService) -> LedgerResult<()> {
    let summary = service.store().aggregate();
    print!(
        "{}",
        summary.format_terminal(&service.settings().currency_symbol)
    );
    Ok(())
}

/// Export all expenses to `path`
pub fn handle_export_command(
    service: &ExpenseService,
    path: &Path,
    format: ExportFormat,
) -> LedgerResult<()> {
    let written = service.export(path, format)?;
    println!(
        "Exported {} expense(s) to {}",
        service.store().len(),
        written.display()
    );
    Ok(())
}

/// Create a backup, or list the existing ones
pub fn handle_backup_command(service: &ExpenseService, list: bool) -> LedgerResult<()> {
    if !list {
        let path = service.backup()?;
        println!("Backup created: {}", path.display());
        return Ok(());
    }

    let backups = service.backups().list_backups()?;
    if backups.is_empty() {
        println!("No backups found.");
        println!("Create one with: expenses backup");
        return Ok(());
    }

    println!("Available Backups");
    println!("=================");
    for backup in &backups {
        println!(
            "  {}  {}  {} bytes",
            backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            backup.filename,
            backup.size_bytes
        );
    }
    println!();
    println!("Total: {} backup(s)", backups.len());
    Ok(())
}

/// Show resolved paths and the active settings
///
/// Writes the settings file with defaults when it does not exist yet, so
/// there is something to edit.
pub fn handle_config_command(
    paths: &LedgerPaths,
    settings: &Settings,
) -> LedgerResult<()> {
    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    println!("Expense Tracker Configuration");
    println!("=============================");
    println!("Data directory:  {}", paths.base_dir().display());
    println!("Data file:       {}", paths.data_file().display());
    println!("Settings file:   {}", paths.settings_file().display());
    println!("Audit log:       {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("{}", settings.to_pretty_json()?);
    Ok(())
}

/// Show the most recent audit log entries, optionally for one expense only
pub fn handle_log_command(
    service: &ExpenseService,
    count: usize,
    expense: Option<ExpenseId>,
) -> LedgerResult<()> {
    let Some(audit) = service.audit_log() else {
        println!("Audit logging is disabled in the settings.");
        return Ok(());
    };

    let entries = match expense {
        Some(id) => {
            let mut entries = audit.read_for_expense(id)?;
            let older = entries.len().saturating_sub(count);
            entries.drain(..older);
            entries
        }
        None => audit.read_recent(count)?,
    };
    if entries.is_empty() {
        match expense {
            Some(id) => println!("No audit entries for expense #{}.", id),
            None => println!("No audit entries yet."),
        }
        return Ok(());
    }
    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
