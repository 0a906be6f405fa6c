//! Expense Summary
//!
//! Overall statistics plus breakdowns by category, payment method and month,
//! and a nominal projection of recurring expenses.

use std::collections::BTreeMap;

use crate::display::truncate;
use crate::models::{Expense, Money, MonthKey};

/// Totals for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    /// Category name
    pub category: String,
    /// Number of expenses
    pub count: usize,
    /// Sum of amounts
    pub total: Money,
    /// Average amount, rounded to the cent
    pub average: Money,
    /// Share of the overall total
    pub percentage: f64,
}

/// Totals for one payment method
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethodSummary {
    pub payment_method: String,
    pub count: usize,
    pub total: Money,
    pub percentage: f64,
}

/// Totals for one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub month: MonthKey,
    pub count: usize,
    pub total: Money,
}

/// Recurring expenses treated as one monthly bill
///
/// The annual figure is the monthly total times twelve; start and end dates
/// of recurring items are not considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecurringProjection {
    pub count: usize,
    pub monthly_total: Money,
    pub annual_estimate: Money,
}

/// Summary of a set of expenses
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of expenses
    pub count: usize,
    /// Sum of all amounts
    pub total: Money,
    /// Average amount, rounded to the cent
    pub average: Money,
    /// Largest expense (first one on ties)
    pub highest: Option<Expense>,
    /// Smallest expense (first one on ties)
    pub lowest: Option<Expense>,
    /// Per-category totals, alphabetical
    pub by_category: Vec<CategorySummary>,
    /// Per-payment-method totals, alphabetical
    pub by_payment_method: Vec<PaymentMethodSummary>,
    /// Per-month totals, chronological
    pub by_month: Vec<MonthSummary>,
    /// Recurring expense projection
    pub recurring: RecurringProjection,
}

impl Summary {
    /// Compute the summary of a record sequence
    pub fn compute(expenses: &[Expense]) -> Self {
        let total: Money = expenses.iter().map(|e| e.amount).sum();

        let mut highest: Option<&Expense> = None;
        let mut lowest: Option<&Expense> = None;
        for expense in expenses {
            if highest.map_or(true, |h| expense.amount > h.amount) {
                highest = Some(expense);
            }
            if lowest.map_or(true, |l| expense.amount < l.amount) {
                lowest = Some(expense);
            }
        }

        let mut categories: BTreeMap<&str, (usize, Money)> = BTreeMap::new();
        let mut methods: BTreeMap<&str, (usize, Money)> = BTreeMap::new();
        let mut months: BTreeMap<MonthKey, (usize, Money)> = BTreeMap::new();
        let mut recurring = RecurringProjection::default();

        for expense in expenses {
            let entry = categories
                .entry(expense.category.as_str())
                .or_insert((0, Money::zero()));
            entry.0 += 1;
            entry.1 += expense.amount;

            let entry = methods
                .entry(expense.payment_method.as_str())
                .or_insert((0, Money::zero()));
            entry.0 += 1;
            entry.1 += expense.amount;

            let entry = months
                .entry(MonthKey::of(expense.date))
                .or_insert((0, Money::zero()));
            entry.0 += 1;
            entry.1 += expense.amount;

            if expense.is_recurring {
                recurring.count += 1;
                recurring.monthly_total += expense.amount;
            }
        }
        recurring.annual_estimate = recurring.monthly_total * 12;

        let by_category = categories
            .into_iter()
            .map(|(category, (count, amount))| CategorySummary {
                category: category.to_string(),
                count,
                total: amount,
                average: amount.divide_by(count),
                percentage: amount.percent_of(total),
            })
            .collect();

        let by_payment_method = methods
            .into_iter()
            .map(|(method, (count, amount))| PaymentMethodSummary {
                payment_method: method.to_string(),
                count,
                total: amount,
                percentage: amount.percent_of(total),
            })
            .collect();

        let by_month = months
            .into_iter()
            .map(|(month, (count, amount))| MonthSummary {
                month,
                count,
                total: amount,
            })
            .collect();

        Self {
            count: expenses.len(),
            total,
            average: total.divide_by(expenses.len()),
            highest: highest.cloned(),
            lowest: lowest.cloned(),
            by_category,
            by_payment_method,
            by_month,
            recurring,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Category entry by exact name
    pub fn category(&self, name: &str) -> Option<&CategorySummary> {
        self.by_category.iter().find(|c| c.category == name)
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let money = |amount: Money| amount.format_with_symbol(symbol);
        let mut output = String::new();

        output.push_str("Expense Summary\n");
        output.push_str(&"=".repeat(65));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No expenses found.\n");
            return output;
        }

        output.push_str(&format!("Total expenses: {}\n", self.count));
        output.push_str(&format!("Total amount: {}\n", money(self.total)));
        output.push_str(&format!("Average expense: {}\n", money(self.average)));
        if let Some(highest) = &self.highest {
            output.push_str(&format!(
                "Highest expense: {} ({})\n",
                money(highest.amount),
                highest.description
            ));
        }
        if let Some(lowest) = &self.lowest {
            output.push_str(&format!(
                "Lowest expense: {} ({})\n",
                money(lowest.amount),
                lowest.description
            ));
        }

        // Category breakdown
        output.push_str("\nBy Category\n");
        output.push_str(&format!(
            "{:<20} {:>6} {:>12} {:>12} {:>8}\n",
            "Category", "Count", "Total", "Average", "%"
        ));
        output.push_str(&"-".repeat(65));
        output.push('\n');
        for category in &self.by_category {
            output.push_str(&format!(
                "{:<20} {:>6} {:>12} {:>12} {:>7.1}%\n",
                truncate(&category.category, 20),
                category.count,
                money(category.total),
                money(category.average),
                category.percentage
            ));
        }

        output.push_str("\nBy Payment Method\n");
        output.push_str(&"-".repeat(65));
        output.push('\n');
        for method in &self.by_payment_method {
            output.push_str(&format!(
                "{:<20} {:>6} {:>12} {:>7.1}%\n",
                truncate(&method.payment_method, 20),
                method.count,
                money(method.total),
                method.percentage
            ));
        }

        // A single month would just repeat the overall total
        if self.by_month.len() > 1 {
            output.push_str("\nBy Month\n");
            output.push_str(&"-".repeat(65));
            output.push('\n');
            for month in &self.by_month {
                output.push_str(&format!(
                    "{:<20} {:>6} {:>12}\n",
                    month.month.to_string(),
                    month.count,
                    money(month.total)
                ));
            }
        }

        if self.recurring.count > 0 {
            output.push_str("\nRecurring Expenses\n");
            output.push_str(&"-".repeat(65));
            output.push('\n');
            output.push_str(&format!("Count: {}\n", self.recurring.count));
            output.push_str(&format!(
                "Monthly total: {}\n",
                money(self.recurring.monthly_total)
            ));
            output.push_str(&format!(
                "Annual projection: {}\n",
                money(self.recurring.annual_estimate)
            ));
        }

        output
    }
}
