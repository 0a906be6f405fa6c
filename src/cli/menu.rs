//! Interactive numbered menu
//!
//! Drives an [`ExpenseService`] from line-oriented input. Errors from the
//! service are printed and the session continues; only end of input or a
//! broken output stream ends it early.

use std::io::{BufRead, Write};

use crate::display::{
    format_category_suggestions, format_expense_details, format_expense_table,
    format_expenses_by_category, format_recurring_expenses, format_search_results,
};
use crate::error::LedgerResult;
use crate::export::ExportFormat;
use crate::models::{ExpenseField, ExpenseUpdate, NewExpense};
use crate::services::{Committed, ExpenseService};
use crate::store::{ExpenseFilter, SortKey};

use super::prompt::{PromptError, PromptResult, Prompter};

/// Phrase the user must type to clear the ledger
pub const CLEAR_CONFIRMATION: &str = "DELETE ALL";

const SUGGESTION_LIMIT: usize = 5;

const MAIN_MENU: &str = "\
========================================
  EXPENSE MANAGEMENT
  1.  Add Expense
  2.  Quick Add Expense
  3.  View All Expenses
  4.  View Expense Details
  5.  View Expenses by Category
  6.  View Recurring Expenses

  SEARCH & FILTER
  7.  Search Expenses

  EDIT & MANAGE
  8.  Update Expense
  9.  Delete Expense
  10. Duplicate Expense

  UNDO/REDO
  11. Undo Last Operation
  12. Redo Last Operation

  REPORTS & ANALYTICS
  13. Generate Summary & Analytics
  14. Export to CSV

  UTILITIES
  15. Backup Data
  16. Clear All Data

  0.  Exit Application
========================================";

/// What the main loop should do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// The interactive menu session
pub struct Menu<'a, R, W> {
    service: &'a mut ExpenseService,
    io: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a mut ExpenseService, input: R, output: W) -> Self {
        Self {
            service,
            io: Prompter::new(input, output),
        }
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> PromptResult<()> {
        self.io.say("========================================")?;
        self.io.say("        Welcome to Expense Tracker")?;
        self.io.say("========================================")?;
        let report = self.service.load_report();
        self.io.say(report.message())?;

        loop {
            match self.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) | Err(PromptError::Closed) => break,
                Err(e) => return Err(e),
            }
        }

        self.io.say("\nYour data has been saved automatically. Goodbye!")?;
        Ok(())
    }

    fn step(&mut self) -> PromptResult<Flow> {
        self.io.say(format!("\n{}", MAIN_MENU))?;
        let choice = self.io.choice("\nEnter your choice (0-16): ", 0, 16)?;
        self.io.say(format!("\n{}", "=".repeat(50)))?;

        match choice {
            1 => self.add_expense()?,
            2 => self.quick_add()?,
            3 => self.view_all()?,
            4 => self.view_details()?,
            5 => self.view_by_category()?,
            6 => self.view_recurring()?,
            7 => self.search()?,
            8 => self.update_expense()?,
            9 => self.delete_expense()?,
            10 => self.duplicate_expense()?,
            11 => self.undo()?,
            12 => self.redo()?,
            13 => self.summary()?,
            14 => self.export_csv()?,
            15 => self.backup()?,
            16 => self.clear_all()?,
            _ => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn symbol(&self) -> String {
        self.service.settings().currency_symbol.clone()
    }

    /// Print the success line and any warnings, or the error
    fn report<T>(
        &mut self,
        result: LedgerResult<Committed<T>>,
        success: impl FnOnce(&T) -> String,
    ) -> PromptResult<()> {
        match result {
            Ok(committed) => {
                self.io.say(format!("* {}", success(&committed.value)))?;
                for warning in &committed.warnings {
                    self.io.say(format!("Warning: {}", warning))?;
                }
            }
            Err(e) => self.io.say(format!("Error: {}", e))?,
        }
        Ok(())
    }

    fn show_category_suggestions(&mut self) -> PromptResult<()> {
        let hint = format_category_suggestions(
            self.service.store().categories().counts(),
            SUGGESTION_LIMIT,
        );
        if let Some(hint) = hint {
            self.io.say(hint)?;
        }
        Ok(())
    }

    fn add_expense(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Add New Expense ===")?;
        self.show_category_suggestions()?;

        let description = self.io.required("Description: ")?;
        let amount = self.io.amount("Amount: ")?;
        let category = self.io.required("Category: ")?;
        let date = self.io.date_or_today("Date (YYYY-MM-DD, empty for today): ")?;
        let notes = self.io.line("Notes (optional): ")?;
        let recurring = self.io.yes_no("Is this a recurring expense? (y/n): ")?;
        let method_prompt = format!(
            "Payment method (empty for {}): ",
            self.service.settings().default_payment_method
        );
        let payment_method = self.io.line(&method_prompt)?;
        let location = self.io.line("Location (optional): ")?;

        let mut input = NewExpense::new(description, amount, category)
            .date(date)
            .notes(notes)
            .recurring(recurring)
            .location(location);
        if !payment_method.is_empty() {
            input = input.payment_method(payment_method);
        }

        let result = self.service.add(input);
        self.report(result, |e| format!("Expense added successfully! ID: {}", e.id))
    }

    fn quick_add(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Quick Add Expense ===")?;
        let description = self.io.required("Description: ")?;
        let amount = self.io.amount("Amount: ")?;
        let category_prompt = format!(
            "Category (empty for {}): ",
            self.service.suggested_category()
        );
        let category = self.io.line(&category_prompt)?;

        let result = self.service.quick_add(&description, amount, &category);
        self.report(result, |e| format!("Quick expense added! ID: {}", e.id))
    }

    fn view_all(&mut self) -> PromptResult<()> {
        self.io.say("\n=== All Expenses ===")?;
        if self.service.store().is_empty() {
            return self.io.say("No expenses found.");
        }

        self.io
            .say("Sort by: 1) Date  2) Amount  3) Category  4) ID (default)")?;
        let sort = match self.io.choice("Choose sort option (1-4): ", 1, 4)? {
            1 => SortKey::DateDesc,
            2 => SortKey::AmountDesc,
            3 => SortKey::CategoryAsc,
            _ => SortKey::Insertion,
        };

        let table = format_expense_table(&self.service.store().list(sort), &self.symbol());
        write!(self.io.out(), "{}", table)?;
        Ok(())
    }

    fn view_details(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Expense Details ===")?;
        let id = self.io.id("Enter expense ID: ")?;
        let text = match self.service.store().get(id) {
            Ok(expense) => format_expense_details(expense, &self.symbol()),
            Err(e) => format!("Error: {}\n", e),
        };
        write!(self.io.out(), "{}", text)?;
        Ok(())
    }

    fn view_by_category(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Expenses by Category ===")?;
        let text = format_expenses_by_category(self.service.store().expenses(), &self.symbol());
        write!(self.io.out(), "{}", text)?;
        Ok(())
    }

    fn view_recurring(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Recurring Expenses ===")?;
        let text = format_recurring_expenses(self.service.store().expenses(), &self.symbol());
        write!(self.io.out(), "{}", text)?;
        Ok(())
    }

    fn search(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Search Expenses ===")?;
        self.io.say("1. Search by description")?;
        self.io.say("2. Search by category")?;
        self.io.say("3. Search by date range")?;
        self.io.say("4. Search by amount range")?;
        self.io.say("5. Search by payment method")?;
        self.io.say("6. Advanced search (multiple criteria)")?;

        let mut filter = match self.io.choice("Choose search type (1-6): ", 1, 6)? {
            1 => ExpenseFilter::new().description(self.io.required("Description contains: ")?),
            2 => {
                self.show_category_suggestions()?;
                ExpenseFilter::new().category(self.io.required("Category: ")?)
            }
            3 => {
                let start = self.io.date("Start date (YYYY-MM-DD): ")?;
                let end = self.io.date("End date (YYYY-MM-DD): ")?;
                ExpenseFilter::new().date_range(start, end)
            }
            4 => {
                let min = self.io.amount("Minimum amount: ")?;
                let max = self.io.amount("Maximum amount: ")?;
                ExpenseFilter::new().amount_range(min, max)
            }
            5 => {
                let methods: Vec<&str> =
                    self.service.store().payment_methods().into_iter().collect();
                if !methods.is_empty() {
                    let hint = format!("Payment methods in use: {}", methods.join(", "));
                    self.io.say(hint)?;
                }
                ExpenseFilter::new().payment_method(self.io.required("Payment method: ")?)
            }
            _ => self.advanced_filter()?,
        };

        if filter.normalize() {
            self.io.say("Note: range corrected (bounds were reversed).")?;
        }

        let results = self.service.store().search(&filter);
        let text = format_search_results(&results, &filter.describe(), &self.symbol());
        write!(self.io.out(), "{}", text)?;
        Ok(())
    }

    fn advanced_filter(&mut self) -> PromptResult<ExpenseFilter> {
        self.io.say("Enter search criteria (leave empty to skip):")?;
        let mut filter = ExpenseFilter::new()
            .description(self.io.line("Description contains: ")?)
            .category(self.io.line("Category: ")?)
            .payment_method(self.io.line("Payment method: ")?);

        filter.min_amount = self.io.optional_amount("Minimum amount (or empty): ")?;
        filter.max_amount = self.io.optional_amount("Maximum amount (or empty): ")?;
        filter.start_date = self.io.optional_date("Start date (YYYY-MM-DD or empty): ")?;
        filter.end_date = self.io.optional_date("End date (YYYY-MM-DD or empty): ")?;
        filter.recurring = self.io.optional_yes_no("Recurring only? (y/n or empty): ")?;
        Ok(filter)
    }

    fn update_expense(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Update Expense ===")?;
        let id = self.io.id("Enter expense ID to update: ")?;
        let current = match self.service.store().get(id) {
            Ok(expense) => format_expense_details(expense, &self.symbol()),
            Err(e) => return self.io.say(format!("Error: {}", e)),
        };
        write!(self.io.out(), "\n{}\n", current)?;

        self.io.say("What would you like to update?")?;
        for (n, field) in ExpenseField::ALL.iter().enumerate() {
            self.io.say(format!("{}. {}", n + 1, capitalize(&field.to_string())))?;
        }
        self.io.say("9. All fields")?;

        let choice = self.io.choice("Choose field (1-9): ", 1, 9)? as usize;
        let result = match ExpenseField::ALL.get(choice - 1) {
            Some(&field) => {
                let value = self.io.line(&format!("New {}: ", field))?;
                self.service.update(id, field, &value)
            }
            None => {
                let update = self.read_full_update()?;
                if update.is_empty() {
                    return self.io.say("No changes made.");
                }
                self.service.update_many(id, &update)
            }
        };
        self.report(result, |e| format!("Expense #{} updated successfully!", e.id))
    }

    /// Ask for every field; empty answers keep the current value
    fn read_full_update(&mut self) -> PromptResult<ExpenseUpdate> {
        self.io.say("Leave a field empty to keep its current value.")?;
        let text = |answer: String| (!answer.is_empty()).then_some(answer);

        Ok(ExpenseUpdate {
            description: text(self.io.line("New description: ")?),
            amount: self.io.optional_amount("New amount: ")?,
            category: text(self.io.line("New category: ")?),
            date: self.io.optional_date("New date (YYYY-MM-DD): ")?,
            notes: text(self.io.line("New notes: ")?),
            payment_method: text(self.io.line("New payment method: ")?),
            location: text(self.io.line("New location: ")?),
            is_recurring: self.io.optional_yes_no("Recurring? (y/n): ")?,
        })
    }

    fn delete_expense(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Delete Expense ===")?;
        let id = self.io.id("Enter expense ID to delete: ")?;
        let details = match self.service.store().get(id) {
            Ok(expense) => format_expense_details(expense, &self.symbol()),
            Err(e) => return self.io.say(format!("Error: {}", e)),
        };
        write!(self.io.out(), "\n{}\n", details)?;

        if !self
            .io
            .yes_no("Are you sure you want to delete this expense? (y/n): ")?
        {
            return self.io.say("Deletion cancelled.");
        }
        let result = self.service.delete(id);
        self.report(result, |e| format!("Expense #{} deleted successfully!", e.id))
    }

    fn duplicate_expense(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Duplicate Expense ===")?;
        let id = self.io.id("Enter expense ID to duplicate: ")?;
        let result = self.service.duplicate(id);
        self.report(result, |e| format!("Expense duplicated! New ID: {}", e.id))
    }

    fn undo(&mut self) -> PromptResult<()> {
        let result = self.service.undo();
        self.report(result, |_| "Last operation undone.".to_string())
    }

    fn redo(&mut self) -> PromptResult<()> {
        let result = self.service.redo();
        self.report(result, |_| "Operation redone.".to_string())
    }

    fn summary(&mut self) -> PromptResult<()> {
        let text = self.service.store().aggregate().format_terminal(&self.symbol());
        write!(self.io.out(), "\n{}", text)?;
        Ok(())
    }

    fn export_csv(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Export to CSV ===")?;
        if self.service.store().is_empty() {
            return self.io.say("No expenses to export.");
        }

        let name = self.io.required("Enter CSV filename (without .csv extension): ")?;
        match self.service.export(&name, ExportFormat::Csv) {
            Ok(path) => self
                .io
                .say(format!("* Expenses exported to: {}", path.display())),
            Err(e) => self.io.say(format!("Error: {}", e)),
        }
    }

    fn backup(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Backup Data ===")?;
        match self.service.backup() {
            Ok(path) => self
                .io
                .say(format!("* Data backed up to: {}", path.display())),
            Err(e) => self.io.say(format!("Error: {}", e)),
        }
    }

    fn clear_all(&mut self) -> PromptResult<()> {
        self.io.say("\n=== Clear All Data ===")?;
        self.io.say("WARNING: This will delete ALL expenses!")?;

        let confirmation = self
            .io
            .line(&format!("Type '{}' to confirm: ", CLEAR_CONFIRMATION))?;
        if confirmation != CLEAR_CONFIRMATION {
            return self.io.say("Operation cancelled.");
        }

        let result = Ok(self.service.clear());
        self.report(result, |removed| {
            format!("All expenses have been deleted ({} removed).", removed)
        })
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LedgerPaths, Settings};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_script(temp_dir: &TempDir, script: &str) -> (ExpenseService, String) {
        let paths = LedgerPaths::with_base_dir(temp_dir.path());
        let mut service = ExpenseService::open(&paths, Settings::default()).unwrap();
        let mut output = Vec::new();
        Menu::new(&mut service, Cursor::new(script.as_bytes().to_vec()), &mut output)
            .run()
            .unwrap();
        (service, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_add_then_view() {
        let temp_dir = TempDir::new().unwrap();
        let script = "1\nLunch\n12.50\nFood\n2024-03-15\n\nn\n\n\n3\n4\n0\n";
        let (service, output) = run_script(&temp_dir, script);

        assert!(output.contains("Starting with an empty expense list"));
        assert!(output.contains("* Expense added successfully! ID: 1"));
        assert!(output.contains("$12.50"));
        assert!(output.contains("Goodbye!"));
        assert_eq!(service.store().len(), 1);
        assert_eq!(service.store().expenses()[0].payment_method, "Cash");
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let temp_dir = TempDir::new().unwrap();
        let (_, output) = run_script(&temp_dir, "2\nCoffee\n");
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_quick_add_undo_redo() {
        let temp_dir = TempDir::new().unwrap();
        let script = "2\nCoffee\n3\n\n11\n11\n12\n0\n";
        let (service, output) = run_script(&temp_dir, script);

        assert!(output.contains("* Quick expense added! ID: 1"));
        assert!(output.contains("* Last operation undone."));
        assert!(output.contains("Error: Nothing to undo"));
        assert!(output.contains("* Operation redone."));
        assert_eq!(service.store().expenses()[0].category, "General");
    }

    #[test]
    fn test_search_range_is_corrected() {
        let temp_dir = TempDir::new().unwrap();
        let script = "2\nCoffee\n3\nDrinks\n2\nBook\n30\nBooks\n7\n4\n20\n1\n0\n";
        let (_, output) = run_script(&temp_dir, script);

        assert!(output.contains("Note: range corrected"));
        assert!(output.contains("1 expense(s), total $3.00"));
        assert!(!output.contains("Book "));
    }

    #[test]
    fn test_update_delete_and_missing_ids() {
        let temp_dir = TempDir::new().unwrap();
        let script = concat!(
            "2\nCoffee\n3\nDrinks\n",
            "8\n1\n2\n4.25\n",
            "8\n9\n",
            "9\n1\ny\n",
            "10\n1\n",
            "0\n"
        );
        let (service, output) = run_script(&temp_dir, script);

        assert!(output.contains("* Expense #1 updated successfully!"));
        assert!(output.contains("Error: Expense not found: 9"));
        assert!(output.contains("* Expense #1 deleted successfully!"));
        assert!(output.contains("Error: Expense not found: 1"));
        assert!(service.store().is_empty());
    }

    #[test]
    fn test_clear_requires_exact_phrase() {
        let temp_dir = TempDir::new().unwrap();
        let script = "2\nCoffee\n3\n\n16\ndelete all\n16\nDELETE ALL\n0\n";
        let (service, output) = run_script(&temp_dir, script);

        assert!(output.contains("Operation cancelled."));
        assert!(output.contains("All expenses have been deleted (1 removed)."));
        assert!(service.store().is_empty());
        assert!(service.store().can_undo());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("payment method"), "Payment method");
        assert_eq!(capitalize(""), "");
    }
}
