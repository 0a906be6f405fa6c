//! Audit entry data structures
//!
//! Defines the operations that are audited and the entry format itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Expense;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Expense was added
    Create,
    /// Expense fields were changed
    Update,
    /// Expense was deleted
    Delete,
    /// Expense was copied under a new id
    Duplicate,
    /// Every expense was removed
    Clear,
    /// Most recent change was rolled back
    Undo,
    /// Most recently undone change was re-applied
    Redo,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Duplicate => write!(f, "DUPLICATE"),
            Operation::Clear => write!(f, "CLEAR"),
            Operation::Undo => write!(f, "UNDO"),
            Operation::Redo => write!(f, "REDO"),
        }
    }
}

/// A single audit log entry
///
/// Records one operation with optional before/after values of the affected
/// expense for tracking changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// ID of the affected expense (absent for clear/undo/redo)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Description of the affected expense
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// JSON representation of the expense before the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// JSON representation of the expense after the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable summary of what changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_id: None,
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    fn about(operation: Operation, expense: &Expense) -> Self {
        Self {
            entity_id: Some(expense.id.to_string()),
            entity_name: Some(expense.description.clone()),
            ..Self::new(operation)
        }
    }

    /// Entry for an added expense
    pub fn create(expense: &Expense) -> Self {
        Self {
            after: serde_json::to_value(expense).ok(),
            ..Self::about(Operation::Create, expense)
        }
    }

    /// Entry for a changed expense, with a summary of the changed fields
    pub fn update(before: &Expense, after: &Expense) -> Self {
        let changes = after.changes_from(before);
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary: (!changes.is_empty()).then(|| changes.join(", ")),
            ..Self::about(Operation::Update, after)
        }
    }

    /// Entry for a deleted expense
    pub fn delete(expense: &Expense) -> Self {
        Self {
            before: serde_json::to_value(expense).ok(),
            ..Self::about(Operation::Delete, expense)
        }
    }

    /// Entry for a copy made of `source`
    pub fn duplicate(source: &Expense, copy: &Expense) -> Self {
        Self {
            after: serde_json::to_value(copy).ok(),
            diff_summary: Some(format!("copied from #{}", source.id)),
            ..Self::about(Operation::Duplicate, copy)
        }
    }

    /// Entry for clearing the whole ledger
    pub fn clear(removed: usize) -> Self {
        Self {
            diff_summary: Some(format!("{} expenses removed", removed)),
            ..Self::new(Operation::Clear)
        }
    }

    /// Entry for an undo or redo, noting how many expenses remain
    pub fn history(operation: Operation, expense_count: usize) -> Self {
        Self {
            diff_summary: Some(format!("{} expenses after {}", expense_count, operation)),
            ..Self::new(operation)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation
        );

        if let Some(id) = &self.entity_id {
            output.push_str(&format!(" #{}", id));
        }

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
