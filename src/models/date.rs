//! Calendar date handling for expenses
//!
//! Expense dates are plain `YYYY-MM-DD` calendar dates between 1900 and 2100.
//! Validity follows the Gregorian calendar, so `2024-02-29` is accepted while
//! `2023-02-29` and `2100-02-29` are not.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LedgerError, LedgerResult};

/// Earliest year an expense may be dated
pub const MIN_YEAR: i32 = 1900;

/// Latest year an expense may be dated
pub const MAX_YEAR: i32 = 2100;

/// Parse and validate an expense date in strict `YYYY-MM-DD` form
pub fn parse_date(input: &str) -> LedgerResult<NaiveDate> {
    let s = input.trim();
    let invalid = |reason: &str| {
        LedgerError::Validation(format!(
            "Invalid date '{}': {}. Use YYYY-MM-DD",
            s, reason
        ))
    };

    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return Err(invalid("malformed"));
    }

    // The shape check guarantees these slices are all ASCII digits.
    let year: i32 = s[0..4].parse().map_err(|_| invalid("malformed year"))?;
    let month: u32 = s[5..7].parse().map_err(|_| invalid("malformed month"))?;
    let day: u32 = s[8..10].parse().map_err(|_| invalid("malformed day"))?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(invalid("year must be between 1900 and 2100"));
    }
    if !(1..=12).contains(&month) {
        return Err(invalid("month must be between 01 and 12"));
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid("no such day"))
}

/// Check whether a string is a valid expense date
pub fn is_valid_date(input: &str) -> bool {
    parse_date(input).is_ok()
}

/// Check that an already-constructed date is inside the accepted year range
pub fn validate_date(date: NaiveDate) -> LedgerResult<NaiveDate> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(date)
    } else {
        Err(LedgerError::Validation(format!(
            "Invalid date '{}': year must be between 1900 and 2100",
            date
        )))
    }
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Calendar month used to bucket expenses (e.g., "2024-03")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
