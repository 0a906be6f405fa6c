//! Sorting and filtering of expense listings

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::models::{Expense, Money};

/// Order in which a listing is returned
///
/// Every ordering is a stable sort over insertion order, so records with
/// equal keys keep their relative position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Order in which records were added
    #[default]
    Insertion,
    /// Most recent date first
    DateDesc,
    /// Highest amount first
    AmountDesc,
    /// Category name A to Z
    CategoryAsc,
}

impl SortKey {
    /// Sort records in place
    pub fn sort(&self, expenses: &mut [Expense]) {
        match self {
            Self::Insertion => {}
            Self::DateDesc => expenses.sort_by(|a, b| b.date.cmp(&a.date)),
            Self::AmountDesc => expenses.sort_by(|a, b| b.amount.cmp(&a.amount)),
            Self::CategoryAsc => expenses.sort_by(|a, b| a.category.cmp(&b.category)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insertion => write!(f, "id"),
            Self::DateDesc => write!(f, "date"),
            Self::AmountDesc => write!(f, "amount"),
            Self::CategoryAsc => write!(f, "category"),
        }
    }
}

impl FromStr for SortKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "id" | "insertion" => Ok(Self::Insertion),
            "date" => Ok(Self::DateDesc),
            "amount" => Ok(Self::AmountDesc),
            "category" => Ok(Self::CategoryAsc),
            other => Err(LedgerError::Validation(format!(
                "Unknown sort order '{}'. Use id, date, amount or category",
                other
            ))),
        }
    }
}

/// Search criteria combined with logical AND
///
/// Unset criteria (and blank text criteria) do not filter anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Case-insensitive substring of the description
    pub description: Option<String>,
    /// Case-insensitive exact category
    pub category: Option<String>,
    /// Case-insensitive exact payment method
    pub payment_method: Option<String>,
    /// Inclusive lower amount bound
    pub min_amount: Option<Money>,
    /// Inclusive upper amount bound
    pub max_amount: Option<Money>,
    /// Inclusive start date
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date
    pub end_date: Option<NaiveDate>,
    /// Only recurring (or only one-off) expenses
    pub recurring: Option<bool>,
}

impl ExpenseFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = non_blank(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = non_blank(method.into());
        self
    }

    pub fn min_amount(mut self, amount: Money) -> Self {
        self.min_amount = Some(amount);
        self
    }

    pub fn max_amount(mut self, amount: Money) -> Self {
        self.max_amount = Some(amount);
        self
    }

    pub fn amount_range(self, min: Money, max: Money) -> Self {
        self.min_amount(min).max_amount(max)
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn date_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date(start).end_date(end)
    }

    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = Some(recurring);
        self
    }

    /// Check whether no criterion is set
    pub fn is_empty(&self) -> bool {
        let blank = |s: &Option<String>| s.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.description)
            && blank(&self.category)
            && blank(&self.payment_method)
            && self.min_amount.is_none()
            && self.max_amount.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.recurring.is_none()
    }

    /// Swap reversed amount or date bounds; returns true if anything was swapped
    pub fn normalize(&mut self) -> bool {
        let mut corrected = false;
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                self.min_amount = Some(max);
                self.max_amount = Some(min);
                corrected = true;
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                self.start_date = Some(end);
                self.end_date = Some(start);
                corrected = true;
            }
        }
        corrected
    }

    /// Check whether a record satisfies every set criterion
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(text) = active(&self.description) {
            if !expense
                .description
                .to_lowercase()
                .contains(&text.to_lowercase())
            {
                return false;
            }
        }
        if let Some(category) = active(&self.category) {
            if expense.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }
        if let Some(method) = active(&self.payment_method) {
            if expense.payment_method.to_lowercase() != method.to_lowercase() {
                return false;
            }
        }
        if self.min_amount.map_or(false, |min| expense.amount < min) {
            return false;
        }
        if self.max_amount.map_or(false, |max| expense.amount > max) {
            return false;
        }
        if self.start_date.map_or(false, |start| expense.date < start) {
            return false;
        }
        if self.end_date.map_or(false, |end| expense.date > end) {
            return false;
        }
        if self.recurring.map_or(false, |r| expense.is_recurring != r) {
            return false;
        }
        true
    }

    /// Human-readable description of the active criteria
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(text) = active(&self.description) {
            parts.push(format!("description contains '{}'", text));
        }
        if let Some(category) = active(&self.category) {
            parts.push(format!("category: {}", category));
        }
        if let Some(method) = active(&self.payment_method) {
            parts.push(format!("payment method: {}", method));
        }
        match (self.min_amount, self.max_amount) {
            (Some(min), Some(max)) => parts.push(format!("amount: {} to {}", min, max)),
            (Some(min), None) => parts.push(format!("amount >= {}", min)),
            (None, Some(max)) => parts.push(format!("amount <= {}", max)),
            (None, None) => {}
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => parts.push(format!("date: {} to {}", start, end)),
            (Some(start), None) => parts.push(format!("date from {}", start)),
            (None, Some(end)) => parts.push(format!("date until {}", end)),
            (None, None) => {}
        }
        match self.recurring {
            Some(true) => parts.push("recurring".to_string()),
            Some(false) => parts.push("one-off".to_string()),
            None => {}
        }

        if parts.is_empty() {
            "all expenses".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
