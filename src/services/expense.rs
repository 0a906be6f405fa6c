//! Expense service
//!
//! Provides the operations the user interface calls: every store mutation is
//! followed by a flush of the data file and an audit entry. A failed flush
//! or audit write is reported as a warning and never undoes the in-memory
//! change; the store stays authoritative for the session.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::backup::BackupManager;
use crate::config::{LedgerPaths, Settings};
use crate::error::LedgerResult;
use crate::export::{export_to_file, ExportFormat};
use crate::models::{Expense, ExpenseField, ExpenseId, ExpenseUpdate, Money, NewExpense};
use crate::storage::{ExpenseFile, LoadReport};
use crate::store::ExpenseStore;

/// Result of a mutation that was applied in memory
///
/// `warnings` lists persistence or audit problems encountered afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> Committed<T> {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Service for expense management
pub struct ExpenseService {
    store: ExpenseStore,
    file: ExpenseFile,
    audit: Option<AuditLogger>,
    backups: BackupManager,
    settings: Settings,
    load_report: LoadReport,
}

impl ExpenseService {
    /// Load the ledger found at `paths`
    pub fn open(paths: &LedgerPaths, settings: Settings) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        let file = ExpenseFile::new(paths.data_file());
        let (records, load_report) = file.load()?;
        let store = ExpenseStore::from_records(records, settings.history_capacity)?;

        let audit = settings
            .audit_enabled
            .then(|| AuditLogger::new(paths.audit_log()));
        let backups = if settings.backup_in_data_dir {
            BackupManager::new(file.path(), paths.backup_dir())
        } else {
            BackupManager::beside(file.path())
        };

        info!(
            path = %file.path().display(),
            loaded = load_report.loaded,
            skipped = load_report.skipped,
            "Opened ledger"
        );

        Ok(Self {
            store,
            file,
            audit,
            backups,
            settings,
            load_report,
        })
    }

    /// Read-only access to the store
    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// What happened while loading the data file
    pub fn load_report(&self) -> LoadReport {
        self.load_report
    }

    pub fn data_file(&self) -> &Path {
        self.file.path()
    }

    pub fn audit_log(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Add an expense; a missing payment method takes the configured default
    pub fn add(&mut self, mut input: NewExpense) -> LedgerResult<Committed<Expense>> {
        if input
            .payment_method
            .as_deref()
            .map_or(true, |m| m.trim().is_empty())
        {
            input.payment_method = Some(self.settings.default_payment_method.clone());
        }

        let expense = self.store.add(input)?;
        let warnings = self.commit(AuditEntry::create(&expense));
        Ok(Committed {
            value: expense,
            warnings,
        })
    }

    /// Add an expense dated today with only description, amount and category
    ///
    /// A blank category falls back to the most used category, or to the
    /// configured fallback when the ledger has none yet.
    pub fn quick_add(
        &mut self,
        description: &str,
        amount: Money,
        category: &str,
    ) -> LedgerResult<Committed<Expense>> {
        let category = if category.trim().is_empty() {
            self.suggested_category()
        } else {
            category.to_string()
        };
        self.add(NewExpense::new(description, amount, category))
    }

    /// Category used by quick add when none is entered
    pub fn suggested_category(&self) -> String {
        self.store
            .most_used_category()
            .map(str::to_string)
            .unwrap_or_else(|| self.settings.quick_add_fallback_category.clone())
    }

    /// Change a single field from raw text input
    pub fn update(
        &mut self,
        id: ExpenseId,
        field: ExpenseField,
        value: &str,
    ) -> LedgerResult<Committed<Expense>> {
        let update = ExpenseUpdate::from_field(field, value)?;
        self.update_many(id, &update)
    }

    /// Apply several field changes as one undo step
    pub fn update_many(
        &mut self,
        id: ExpenseId,
        update: &ExpenseUpdate,
    ) -> LedgerResult<Committed<Expense>> {
        let before = self.store.get(id)?.clone();
        let after = self.store.update_many(id, update)?;
        let warnings = self.commit(AuditEntry::update(&before, &after));
        Ok(Committed {
            value: after,
            warnings,
        })
    }

    pub fn delete(&mut self, id: ExpenseId) -> LedgerResult<Committed<Expense>> {
        let removed = self.store.delete(id)?;
        let warnings = self.commit(AuditEntry::delete(&removed));
        Ok(Committed {
            value: removed,
            warnings,
        })
    }

    pub fn duplicate(&mut self, id: ExpenseId) -> LedgerResult<Committed<Expense>> {
        let copy = self.store.duplicate(id)?;
        let warnings = match self.store.find(id) {
            Some(source) => {
                let entry = AuditEntry::duplicate(source, &copy);
                self.commit(entry)
            }
            None => self.commit(AuditEntry::create(&copy)),
        };
        Ok(Committed {
            value: copy,
            warnings,
        })
    }

    /// Remove every expense; returns how many were removed
    pub fn clear(&mut self) -> Committed<usize> {
        let removed = self.store.clear();
        let warnings = self.commit(AuditEntry::clear(removed));
        Committed {
            value: removed,
            warnings,
        }
    }

    pub fn undo(&mut self) -> LedgerResult<Committed<()>> {
        self.store.undo()?;
        let warnings = self.commit(AuditEntry::history(Operation::Undo, self.store.len()));
        Ok(Committed {
            value: (),
            warnings,
        })
    }

    pub fn redo(&mut self) -> LedgerResult<Committed<()>> {
        self.store.redo()?;
        let warnings = self.commit(AuditEntry::history(Operation::Redo, self.store.len()));
        Ok(Committed {
            value: (),
            warnings,
        })
    }

    /// Write the data file now
    pub fn save(&self) -> LedgerResult<()> {
        self.file.save(self.store.expenses())
    }

    /// Save, then copy the data file to a new timestamped backup
    pub fn backup(&self) -> LedgerResult<PathBuf> {
        self.save()?;
        self.backups.create_backup()
    }

    /// Export every expense in insertion order
    pub fn export(&self, path: impl AsRef<Path>, format: ExportFormat) -> LedgerResult<PathBuf> {
        let written = export_to_file(self.store.expenses(), path, format)?;
        info!(path = %written.display(), ?format, "Exported expenses");
        Ok(written)
    }

    /// Flush the data file and append the audit entry, collecting failures
    fn commit(&self, entry: AuditEntry) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Err(e) = self.save() {
            warn!(error = %e, "Could not save expenses; changes are kept in memory");
            warnings.push(format!(
                "Could not save to {}: {}",
                self.file.path().display(),
                e
            ));
        }

        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log(&entry) {
                warn!(error = %e, "Could not write audit entry");
                warnings.push(format!("Could not write audit log: {}", e));
            }
        }

        warnings
    }
}
