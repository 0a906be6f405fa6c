//! Expense display formatting
//!
//! Tables, detail views and grouped listings of expenses. Every function
//! takes the currency symbol to print amounts with.

use std::collections::BTreeMap;

use crate::models::{Expense, Money};

use super::truncate;

const TABLE_WIDTH: usize = 84;

/// Format a single expense as a table row
pub fn format_expense_row(expense: &Expense, symbol: &str) -> String {
    format!(
        "{:<5} {:<20} {:>11} {:<14} {:<10} {:<10} {}",
        expense.id.to_string(),
        truncate(&expense.description, 20),
        expense.amount.format_with_symbol(symbol),
        truncate(&expense.category, 14),
        expense.date.format("%Y-%m-%d"),
        truncate(&expense.payment_method, 10),
        if expense.is_recurring { "R" } else { "" }
    )
    .trim_end()
    .to_string()
}

/// Format a list of expenses as a table with a total line
pub fn format_expense_table(expenses: &[Expense], symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<5} {:<20} {:>11} {:<14} {:<10} {:<10} {}\n",
        "ID", "Description", "Amount", "Category", "Date", "Payment", "Rec"
    ));
    output.push_str(&"-".repeat(TABLE_WIDTH));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense, symbol));
        output.push('\n');
    }

    output.push_str(&"-".repeat(TABLE_WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{} expense(s), total {}\n",
        expenses.len(),
        total_of(expenses).format_with_symbol(symbol)
    ));
    output
}

/// Format expense details for display
pub fn format_expense_details(expense: &Expense, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     #{}\n", expense.id));
    output.push_str(&format!("Description: {}\n", expense.description));
    output.push_str(&format!(
        "Amount:      {}\n",
        expense.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Category:    {}\n", expense.category));
    output.push_str(&format!("Date:        {}\n", expense.date.format("%Y-%m-%d")));
    output.push_str(&format!("Payment:     {}\n", expense.payment_method));
    output.push_str(&format!(
        "Recurring:   {}\n",
        if expense.is_recurring { "Yes" } else { "No" }
    ));

    if !expense.location.is_empty() {
        output.push_str(&format!("Location:    {}\n", expense.location));
    }
    if !expense.notes.is_empty() {
        output.push_str(&format!("Notes:       {}\n", expense.notes));
    }

    output
}

/// Format search results with the criteria used, match count and total
pub fn format_search_results(results: &[Expense], criteria: &str, symbol: &str) -> String {
    let mut output = format!("Search: {}\n", criteria);
    if results.is_empty() {
        output.push_str("No matching expenses found.\n");
        return output;
    }

    output.push('\n');
    output.push_str(&format_expense_table(results, symbol));
    output
}

/// Format expenses grouped by category, alphabetical, with group totals
/// and each group's share of the grand total
pub fn format_expenses_by_category(expenses: &[Expense], symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut groups: BTreeMap<&str, Vec<&Expense>> = BTreeMap::new();
    for expense in expenses {
        groups.entry(expense.category.as_str()).or_default().push(expense);
    }
    let grand_total = total_of(expenses);

    let mut output = String::new();
    for (category, members) in &groups {
        let total: Money = members.iter().map(|e| e.amount).sum();
        output.push_str(&format!(
            "\n{} ({} expense(s), {}, {:.1}%)\n",
            category.to_uppercase(),
            members.len(),
            total.format_with_symbol(symbol),
            total.percent_of(grand_total)
        ));
        output.push_str(&"-".repeat(TABLE_WIDTH));
        output.push('\n');
        for expense in members {
            output.push_str(&format_expense_row(expense, symbol));
            output.push('\n');
        }
    }

    output.push_str(&format!(
        "\nGrand total: {}\n",
        grand_total.format_with_symbol(symbol)
    ));
    output
}

/// Format recurring expenses with their monthly total
pub fn format_recurring_expenses(expenses: &[Expense], symbol: &str) -> String {
    let recurring: Vec<Expense> = expenses.iter().filter(|e| e.is_recurring).cloned().collect();
    if recurring.is_empty() {
        return "No recurring expenses found.\n".to_string();
    }

    let monthly = total_of(&recurring);
    let mut output = format_expense_table(&recurring, symbol);
    output.push_str(&format!(
        "Monthly recurring total: {}\n",
        monthly.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Annual projection: {}\n",
        (monthly * 12).format_with_symbol(symbol)
    ));
    output
}

/// Format the most used categories as a one-line hint
pub fn format_category_suggestions<'a, I>(counts: I, limit: usize) -> Option<String>
where
    I: IntoIterator<Item = (&'a String, &'a usize)>,
{
    let mut ranked: Vec<_> = counts.into_iter().collect();
    if ranked.is_empty() {
        return None;
    }
    // Stable: equal counts stay alphabetical
    ranked.sort_by(|a, b| b.1.cmp(a.1));
    let names: Vec<&str> = ranked
        .into_iter()
        .take(limit)
        .map(|(name, _)| name.as_str())
        .collect();
    Some(format!("Existing categories: {}", names.join(", ")))
}

fn total_of(expenses: &[Expense]) -> Money {
    expenses.iter().map(|e| e.amount).sum()
}
