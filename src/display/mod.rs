//! Display formatting for terminal output
//!
//! Provides utilities for formatting expenses for terminal display,
//! including tables, detail views and grouped listings.

pub mod expense;

pub use expense::{
    format_category_suggestions, format_expense_details, format_expense_row,
    format_expense_table, format_expenses_by_category, format_recurring_expenses,
    format_search_results,
};

/// Truncate a string to a maximum display length, ending in "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
