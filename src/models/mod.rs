//! Core data models for the expense tracker
//!
//! This module contains the value types of the ledger: the expense record,
//! money amounts, identifiers and calendar dates.

pub mod date;
pub mod expense;
pub mod ids;
pub mod money;

pub use date::{is_valid_date, parse_date, MonthKey};
pub use expense::{
    parse_yes_no, Expense, ExpenseField, ExpenseUpdate, NewExpense, DEFAULT_PAYMENT_METHOD,
};
pub use ids::{ExpenseId, IdAllocator};
pub use money::{Money, MoneyParseError};
