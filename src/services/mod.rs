//! Service layer for the expense tracker
//!
//! The service layer puts persistence and auditing around the in-memory
//! store, so every mutation is flushed and logged the same way.

pub mod expense;

pub use expense::{Committed, ExpenseService};
