//! User settings for the expense tracker
//!
//! Manages user preferences such as history depth, default payment method
//! and whether the audit log is written.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::DEFAULT_PAYMENT_METHOD;
use crate::storage::file_io::write_json_atomic;
use crate::store::DEFAULT_HISTORY_CAPACITY;

/// User settings for the expense tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Snapshots kept on each of the undo and redo stacks
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Payment method used when none is entered
    #[serde(default = "default_payment_method")]
    pub default_payment_method: String,

    /// Category for quick add when the ledger has no categories yet
    #[serde(default = "default_quick_add_category")]
    pub quick_add_fallback_category: String,

    /// Currency symbol used in displays
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Whether mutations are recorded in the audit log
    #[serde(default = "default_true")]
    pub audit_enabled: bool,

    /// Put backups in the backups/ directory instead of next to the data file
    #[serde(default)]
    pub backup_in_data_dir: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

fn default_quick_add_category() -> String {
    "General".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            history_capacity: default_history_capacity(),
            default_payment_method: default_payment_method(),
            quick_add_fallback_category: default_quick_add_category(),
            currency_symbol: default_currency(),
            audit_enabled: default_true(),
            backup_in_data_dir: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        self.validate()?;
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Reject values the rest of the program cannot work with
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.history_capacity == 0 {
            return Err(LedgerError::Config(
                "history_capacity must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("default_payment_method", &self.default_payment_method),
            ("quick_add_fallback_category", &self.quick_add_fallback_category),
        ] {
            if value.trim().is_empty() || value.contains(['|', '\n', '\r']) {
                return Err(LedgerError::Config(format!(
                    "{} must be non-empty text without '|' or line breaks",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Pretty JSON for display
    pub fn to_pretty_json(&self) -> Result<String, LedgerError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))
    }
}
