//! Backup system for the expense tracker
//!
//! `BackupManager` copies the data file to a timestamped sibling
//! (`expenses.txt.backup.1700000000`) and lists existing backups.
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::backup::BackupManager;
//!
//! let manager = BackupManager::beside("expenses.txt");
//! let backup_path = manager.create_backup()?;
//! for backup in manager.list_backups()? {
//!     println!("{} ({} bytes)", backup.filename, backup.size_bytes);
//! }
//! ```

mod manager;

pub use manager::{BackupInfo, BackupManager};
