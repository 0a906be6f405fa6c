//! Expense model
//!
//! Represents a single recorded expense together with the field-level
//! validation rules shared by creation, updates and file loading.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::date::{parse_date, validate_date};
use super::ids::ExpenseId;
use super::money::Money;
use crate::error::{LedgerError, LedgerResult};

/// Payment method recorded when none is given
pub const DEFAULT_PAYMENT_METHOD: &str = "Cash";

/// Suffix appended to the description of a duplicated expense
pub const COPY_SUFFIX: &str = " (Copy)";

/// A single expense record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier, never changes after creation
    pub id: ExpenseId,

    /// What the money was spent on
    pub description: String,

    /// Amount spent (always positive)
    pub amount: Money,

    /// Free-form category name (e.g., "Food")
    pub category: String,

    /// Calendar date of the expense
    pub date: NaiveDate,

    /// Additional notes
    #[serde(default)]
    pub notes: String,

    /// Whether this expense repeats every month
    #[serde(default)]
    pub is_recurring: bool,

    /// Cash, Card, Online, Check, Transfer, ...
    pub payment_method: String,

    /// Where the expense occurred
    #[serde(default)]
    pub location: String,
}

impl Expense {
    /// Build a validated expense from creation input
    ///
    /// `today` is used when the input carries no date.
    pub fn from_input(id: ExpenseId, input: NewExpense, today: NaiveDate) -> LedgerResult<Self> {
        let payment_method = match input.payment_method {
            Some(method) if !method.trim().is_empty() => {
                required_text(ExpenseField::PaymentMethod, &method)?
            }
            _ => DEFAULT_PAYMENT_METHOD.to_string(),
        };

        Ok(Self {
            id,
            description: required_text(ExpenseField::Description, &input.description)?,
            amount: positive_amount(input.amount)?,
            category: required_text(ExpenseField::Category, &input.category)?,
            date: validate_date(input.date.unwrap_or(today))?,
            notes: optional_text(ExpenseField::Notes, &input.notes)?,
            is_recurring: input.is_recurring,
            payment_method,
            location: optional_text(ExpenseField::Location, &input.location)?,
        })
    }

    /// Check every field invariant on an already-built record
    pub fn validate(&self) -> LedgerResult<()> {
        if self.id.value() == 0 {
            return Err(LedgerError::Validation("Expense id must be positive".into()));
        }
        if self.id > ExpenseId::MAX {
            return Err(LedgerError::Validation(format!(
                "Expense id must not exceed {}",
                ExpenseId::MAX
            )));
        }
        required_text(ExpenseField::Description, &self.description)?;
        positive_amount(self.amount)?;
        required_text(ExpenseField::Category, &self.category)?;
        validate_date(self.date)?;
        optional_text(ExpenseField::Notes, &self.notes)?;
        required_text(ExpenseField::PaymentMethod, &self.payment_method)?;
        optional_text(ExpenseField::Location, &self.location)?;
        Ok(())
    }

    /// Create a copy under a new identifier, dated `today`
    pub fn duplicate(&self, id: ExpenseId, today: NaiveDate) -> Self {
        Self {
            id,
            description: format!("{}{}", self.description, COPY_SUFFIX),
            date: today,
            ..self.clone()
        }
    }

    /// Human-readable list of the fields that differ from `before`
    pub fn changes_from(&self, before: &Expense) -> Vec<String> {
        let mut changes = Vec::new();
        if before.description != self.description {
            changes.push(format!(
                "description: '{}' -> '{}'",
                before.description, self.description
            ));
        }
        if before.amount != self.amount {
            changes.push(format!("amount: {} -> {}", before.amount, self.amount));
        }
        if before.category != self.category {
            changes.push(format!(
                "category: '{}' -> '{}'",
                before.category, self.category
            ));
        }
        if before.date != self.date {
            changes.push(format!("date: {} -> {}", before.date, self.date));
        }
        if before.notes != self.notes {
            changes.push("notes changed".to_string());
        }
        if before.payment_method != self.payment_method {
            changes.push(format!(
                "payment method: '{}' -> '{}'",
                before.payment_method, self.payment_method
            ));
        }
        if before.location != self.location {
            changes.push("location changed".to_string());
        }
        if before.is_recurring != self.is_recurring {
            changes.push(format!(
                "recurring: {} -> {}",
                before.is_recurring, self.is_recurring
            ));
        }
        changes
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {}",
            self.id,
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Input for creating a new expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub category: String,
    /// Defaults to today when `None`
    pub date: Option<NaiveDate>,
    pub notes: String,
    pub is_recurring: bool,
    /// Defaults to "Cash" when `None` or blank
    pub payment_method: Option<String>,
    pub location: String,
}

impl NewExpense {
    /// Create input with the required fields; everything else defaulted
    pub fn new(description: impl Into<String>, amount: Money, category: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            date: None,
            notes: String::new(),
            is_recurring: false,
            payment_method: None,
            location: String::new(),
        }
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn recurring(mut self, is_recurring: bool) -> Self {
        self.is_recurring = is_recurring;
        self
    }

    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// An editable expense field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseField {
    Description,
    Amount,
    Category,
    Date,
    Notes,
    PaymentMethod,
    Location,
    Recurring,
}

impl ExpenseField {
    /// All editable fields in menu order
    pub const ALL: [ExpenseField; 8] = [
        Self::Description,
        Self::Amount,
        Self::Category,
        Self::Date,
        Self::Notes,
        Self::PaymentMethod,
        Self::Location,
        Self::Recurring,
    ];
}

impl fmt::Display for ExpenseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Date => "date",
            Self::Notes => "notes",
            Self::PaymentMethod => "payment method",
            Self::Location => "location",
            Self::Recurring => "recurring",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ExpenseField {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "description" | "desc" => Ok(Self::Description),
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            "date" => Ok(Self::Date),
            "notes" | "note" => Ok(Self::Notes),
            "payment_method" | "payment" => Ok(Self::PaymentMethod),
            "location" => Ok(Self::Location),
            "recurring" | "is_recurring" => Ok(Self::Recurring),
            _ => Err(LedgerError::Validation(format!("Unknown field: '{}'", s.trim()))),
        }
    }
}

/// A set of field changes applied to one expense as a single mutation
///
/// `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub location: Option<String>,
    pub is_recurring: Option<bool>,
}

impl ExpenseUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single-field update from raw text input
    pub fn from_field(field: ExpenseField, value: &str) -> LedgerResult<Self> {
        let mut update = Self::new();
        match field {
            ExpenseField::Description => update.description = Some(value.to_string()),
            ExpenseField::Amount => {
                let amount = Money::parse(value).map_err(|e| {
                    LedgerError::Validation(format!(
                        "{}. Enter a positive amount like 10.50",
                        e
                    ))
                })?;
                update.amount = Some(amount);
            }
            ExpenseField::Category => update.category = Some(value.to_string()),
            ExpenseField::Date => update.date = Some(parse_date(value)?),
            ExpenseField::Notes => update.notes = Some(value.to_string()),
            ExpenseField::PaymentMethod => update.payment_method = Some(value.to_string()),
            ExpenseField::Location => update.location = Some(value.to_string()),
            ExpenseField::Recurring => update.is_recurring = Some(parse_yes_no(value)?),
        }
        Ok(update)
    }

    /// Check whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produce the updated record, or an error if any field is invalid
    ///
    /// The original record is never touched; on error nothing is applied.
    pub fn apply_to(&self, expense: &Expense) -> LedgerResult<Expense> {
        let mut updated = expense.clone();

        if let Some(description) = &self.description {
            updated.description = required_text(ExpenseField::Description, description)?;
        }
        if let Some(amount) = self.amount {
            updated.amount = positive_amount(amount)?;
        }
        if let Some(category) = &self.category {
            updated.category = required_text(ExpenseField::Category, category)?;
        }
        if let Some(date) = self.date {
            updated.date = validate_date(date)?;
        }
        if let Some(notes) = &self.notes {
            updated.notes = optional_text(ExpenseField::Notes, notes)?;
        }
        if let Some(method) = &self.payment_method {
            updated.payment_method = required_text(ExpenseField::PaymentMethod, method)?;
        }
        if let Some(location) = &self.location {
            updated.location = optional_text(ExpenseField::Location, location)?;
        }
        if let Some(is_recurring) = self.is_recurring {
            updated.is_recurring = is_recurring;
        }

        Ok(updated)
    }
}

/// Parse a yes/no answer ("y", "yes", "1", "n", "no", "0", "true", "false")
pub fn parse_yes_no(input: &str) -> LedgerResult<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "1" | "true" => Ok(true),
        "n" | "no" | "0" | "false" => Ok(false),
        other => Err(LedgerError::Validation(format!(
            "Expected yes or no, got '{}'",
            other
        ))),
    }
}

fn positive_amount(amount: Money) -> LedgerResult<Money> {
    if amount > Money::MAX {
        Err(LedgerError::Validation(format!(
            "Amount must not exceed {}, got {}",
            Money::MAX,
            amount
        )))
    } else if amount.is_positive() {
        Ok(amount)
    } else {
        Err(LedgerError::Validation(format!(
            "Amount must be greater than zero, got {}",
            amount
        )))
    }
}

fn required_text(field: ExpenseField, value: &str) -> LedgerResult<String> {
    let value = optional_text(field, value)?;
    if value.is_empty() {
        return Err(LedgerError::Validation(format!("The {} cannot be empty", field)));
    }
    Ok(value)
}

fn optional_text(field: ExpenseField, value: &str) -> LedgerResult<String> {
    // '|' and line breaks would corrupt the line-oriented data file.
    if value.contains(['|', '\n', '\r']) {
        return Err(LedgerError::Validation(format!(
            "The {} cannot contain '|' or line breaks",
            field
        )));
    }
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lunch() -> Expense {
        let input = NewExpense::new("Lunch", Money::from_cents(1250), "Food").date(date(2024, 3, 15));
        Expense::from_input(ExpenseId::new(1), input, date(2024, 6, 1)).unwrap()
    }

    #[test]
    fn test_from_input_defaults() {
        let expense = lunch();
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.amount.cents(), 1250);
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.date, date(2024, 3, 15));
        assert_eq!(expense.payment_method, DEFAULT_PAYMENT_METHOD);
        assert!(!expense.is_recurring);
        assert!(expense.notes.is_empty());
        assert!(expense.location.is_empty());
    }

    #[test]
    fn test_from_input_uses_today_without_date() {
        let input = NewExpense::new("Coffee", Money::from_cents(300), "Food");
        let expense = Expense::from_input(ExpenseId::new(2), input, date(2024, 6, 1)).unwrap();
        assert_eq!(expense.date, date(2024, 6, 1));
    }

    #[test]
    fn test_from_input_trims_text() {
        let input = NewExpense::new("  Taxi  ", Money::from_cents(900), " Transport ")
            .payment_method("  Card ")
            .notes(" late ");
        let expense = Expense::from_input(ExpenseId::new(3), input, date(2024, 6, 1)).unwrap();
        assert_eq!(expense.description, "Taxi");
        assert_eq!(expense.category, "Transport");
        assert_eq!(expense.payment_method, "Card");
        assert_eq!(expense.notes, "late");
    }

    #[test]
    fn test_from_input_rejects_invalid_fields() {
        let today = date(2024, 6, 1);
        let zero = NewExpense::new("Lunch", Money::zero(), "Food");
        assert!(Expense::from_input(ExpenseId::new(1), zero, today).unwrap_err().is_validation());

        let negative = NewExpense::new("Lunch", Money::from_cents(-500), "Food");
        assert!(Expense::from_input(ExpenseId::new(1), negative, today).is_err());

        let blank = NewExpense::new("   ", Money::from_cents(500), "Food");
        assert!(Expense::from_input(ExpenseId::new(1), blank, today).is_err());

        let no_category = NewExpense::new("Lunch", Money::from_cents(500), "");
        assert!(Expense::from_input(ExpenseId::new(1), no_category, today).is_err());

        let pipe = NewExpense::new("Fish|Chips", Money::from_cents(500), "Food");
        assert!(Expense::from_input(ExpenseId::new(1), pipe, today).is_err());

        let ancient = NewExpense::new("Lunch", Money::from_cents(500), "Food").date(date(1850, 1, 1));
        assert!(Expense::from_input(ExpenseId::new(1), ancient, today).is_err());
    }

    #[test]
    fn test_blank_payment_method_defaults_to_cash() {
        let input = NewExpense::new("Lunch", Money::from_cents(500), "Food").payment_method("  ");
        let expense = Expense::from_input(ExpenseId::new(1), input, date(2024, 6, 1)).unwrap();
        assert_eq!(expense.payment_method, "Cash");
    }

    #[test]
    fn test_duplicate() {
        let mut original = lunch();
        original.notes = "with team".into();
        original.is_recurring = true;
        original.location = "Cafe".into();

        let copy = original.duplicate(ExpenseId::new(9), date(2024, 6, 1));
        assert_eq!(copy.id, ExpenseId::new(9));
        assert_eq!(copy.description, "Lunch (Copy)");
        assert_eq!(copy.date, date(2024, 6, 1));
        assert_eq!(copy.amount, original.amount);
        assert_eq!(copy.category, original.category);
        assert_eq!(copy.notes, original.notes);
        assert_eq!(copy.is_recurring, original.is_recurring);
        assert_eq!(copy.payment_method, original.payment_method);
        assert_eq!(copy.location, original.location);
    }

    #[test]
    fn test_update_from_field() {
        let expense = lunch();

        let update = ExpenseUpdate::from_field(ExpenseField::Amount, "20.00").unwrap();
        let updated = update.apply_to(&expense).unwrap();
        assert_eq!(updated.amount.cents(), 2000);
        assert_eq!(updated.id, expense.id);

        let update = ExpenseUpdate::from_field(ExpenseField::Recurring, "y").unwrap();
        assert!(update.apply_to(&expense).unwrap().is_recurring);
    }

    #[test]
    fn test_update_rejects_invalid_amounts() {
        assert!(ExpenseUpdate::from_field(ExpenseField::Amount, "-5").is_err());
        assert!(ExpenseUpdate::from_field(ExpenseField::Amount, "abc").is_err());

        let update = ExpenseUpdate::from_field(ExpenseField::Amount, "0").unwrap();
        assert!(update.apply_to(&lunch()).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let expense = lunch();
        let update = ExpenseUpdate {
            description: Some("Dinner".into()),
            category: Some("   ".into()),
            ..ExpenseUpdate::default()
        };
        assert!(update.apply_to(&expense).is_err());
        assert_eq!(expense.description, "Lunch");
    }

    #[test]
    fn test_update_rejects_blank_payment_method() {
        let update = ExpenseUpdate::from_field(ExpenseField::PaymentMethod, " ").unwrap();
        assert!(update.apply_to(&lunch()).is_err());
    }

    #[test]
    fn test_field_parse() {
        assert_eq!("amount".parse::<ExpenseField>().unwrap(), ExpenseField::Amount);
        assert_eq!(
            "payment-method".parse::<ExpenseField>().unwrap(),
            ExpenseField::PaymentMethod
        );
        assert_eq!("Recurring".parse::<ExpenseField>().unwrap(), ExpenseField::Recurring);
        assert!("colour".parse::<ExpenseField>().is_err());
    }

    #[test]
    fn test_changes_from() {
        let before = lunch();
        let mut after = before.clone();
        after.amount = Money::from_cents(1500);
        after.category = "Dining".into();

        let changes = after.changes_from(&before);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0], "amount: $12.50 -> $15.00");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", lunch()), "#1 2024-03-15 Lunch $12.50");
    }
}
