//! Line codec for the expense data file
//!
//! One record per line, fields separated by '|':
//!
//! ```text
//! id|description|amount|category|date|notes|recurring|paymentMethod|location
//! ```
//!
//! Amounts are written with two decimals and the recurring flag as `0`/`1`.
//! The older five-field form `id|description|amount|category|date` is still
//! read; its missing fields take their defaults. Files written by older
//! versions may carry a truncated tail, so any line with five to eight fields
//! is read in the short form and fields past the ninth are ignored.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{parse_date, Expense, ExpenseId, Money, NewExpense};

/// Field separator
pub const SEPARATOR: char = '|';

/// Number of fields in a current record line
///
/// Also the minimum for a line to be read in the full form.
pub const FULL_FIELD_COUNT: usize = 9;

/// Number of fields in a legacy record line, and the minimum for any line
pub const LEGACY_FIELD_COUNT: usize = 5;

/// Why a line could not be turned into a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// Fewer than [`LEGACY_FIELD_COUNT`] fields
    #[error("expected at least 5 fields, found {0}")]
    FieldCount(usize),

    #[error("id '{0}' is above the supported maximum")]
    IdOutOfRange(String),

    #[error("invalid id '{0}'")]
    InvalidId(String),

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("invalid recurring flag '{0}'")]
    InvalidRecurring(String),

    #[error("{0}")]
    InvalidRecord(String),
}

/// Encode a record as a single line (without the trailing newline)
pub fn encode_line(expense: &Expense) -> String {
    [
        expense.id.to_string(),
        expense.description.clone(),
        expense.amount.to_decimal_string(),
        expense.category.clone(),
        expense.date.format("%Y-%m-%d").to_string(),
        expense.notes.clone(),
        if expense.is_recurring { "1" } else { "0" }.to_string(),
        expense.payment_method.clone(),
        expense.location.clone(),
    ]
    .join(&SEPARATOR.to_string())
}

/// Decode one line in either the full or the legacy form
///
/// The decoded record passes the same validation as a newly added one.
pub fn decode_line(line: &str) -> Result<Expense, LineError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(SEPARATOR).collect();

    if fields.len() < LEGACY_FIELD_COUNT {
        return Err(LineError::FieldCount(fields.len()));
    }

    let id: u64 = fields[0]
        .trim()
        .parse()
        .map_err(|_| LineError::InvalidId(fields[0].to_string()))?;
    if id == 0 {
        return Err(LineError::InvalidId(fields[0].to_string()));
    }
    if id > ExpenseId::MAX.value() {
        return Err(LineError::IdOutOfRange(fields[0].to_string()));
    }

    let amount =
        Money::parse(fields[2]).map_err(|_| LineError::InvalidAmount(fields[2].to_string()))?;
    let date: NaiveDate =
        parse_date(fields[4]).map_err(|_| LineError::InvalidDate(fields[4].to_string()))?;

    let mut input = NewExpense::new(fields[1], amount, fields[3]).date(date);
    if fields.len() >= FULL_FIELD_COUNT {
        input = input
            .notes(fields[5])
            .recurring(decode_flag(fields[6])?)
            .payment_method(fields[7])
            .location(fields[8]);
    }

    Expense::from_input(ExpenseId::new(id), input, date)
        .map_err(|e| LineError::InvalidRecord(e.to_string()))
}

fn decode_flag(field: &str) -> Result<bool, LineError> {
    match field.trim() {
        "1" => Ok(true),
        "0" | "" => Ok(false),
        other => Err(LineError::InvalidRecurring(other.to_string())),
    }
}
