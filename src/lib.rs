//! Expense Tracker - single-user expense ledger for the terminal
//!
//! This library provides the core of the `expenses` binary: an in-memory
//! expense store with undo/redo history, a flat-file persistence layer, and
//! the reports, exports and backups built on top of it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, money, identifiers, dates)
//! - `store`: In-memory store, history, category index and queries
//! - `storage`: Line-oriented data file storage layer
//! - `services`: Store plus persistence and auditing
//! - `audit`: Audit logging system
//! - `backup`: Timestamped backups of the data file
//! - `export`: CSV and JSON export
//! - `reports`: Summary statistics
//! - `display`: Terminal formatting
//! - `cli`: Interactive menu and one-shot commands
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{LedgerPaths, Settings};
//! use expense_tracker::services::ExpenseService;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut service = ExpenseService::open(&paths, settings)?;
//! ```

use std::sync::Once;

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod store;

pub use error::{LedgerError, LedgerResult};

static TRACING_INIT: Once = Once::new();

/// Install the stderr log subscriber; later calls do nothing
///
/// Defaults to warnings from this crate; `RUST_LOG` overrides it.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("expense_tracker=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
