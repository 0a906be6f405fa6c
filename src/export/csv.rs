//! CSV Export functionality
//!
//! Writes expenses as spreadsheet-compatible CSV. Text columns are always
//! quoted, the recurring flag is `Yes`/`No` and amounts carry two decimals.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Expense;

/// Header row of the expense CSV export
pub const CSV_HEADER: &str = "ID,Description,Amount,Category,Date,Notes,Recurring,PaymentMethod,Location";

/// Export expenses to CSV in the given order
pub fn export_expenses_csv<W: Write>(expenses: &[Expense], writer: &mut W) -> LedgerResult<()> {
    writeln!(writer, "{}", CSV_HEADER).map_err(|e| LedgerError::Export(e.to_string()))?;

    for expense in expenses {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{}",
            expense.id,
            quote(&expense.description),
            expense.amount.to_decimal_string(),
            quote(&expense.category),
            expense.date.format("%Y-%m-%d"),
            quote(&expense.notes),
            if expense.is_recurring { "Yes" } else { "No" },
            quote(&expense.payment_method),
            quote(&expense.location),
        )
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    }

    writer.flush().map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

/// Quote a text field, doubling embedded quotes
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
