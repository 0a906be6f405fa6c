//! Derived category index
//!
//! The set of distinct categories and how often each is used. It is always
//! rebuilt from the full record sequence, never patched incrementally.

use std::collections::BTreeMap;

use crate::models::Expense;

/// Category names and usage counts derived from a record sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    counts: BTreeMap<String, usize>,
}

impl CategoryIndex {
    /// Build the index from scratch
    pub fn rebuild(expenses: &[Expense]) -> Self {
        let mut counts = BTreeMap::new();
        for expense in expenses {
            *counts.entry(expense.category.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Distinct category names in alphabetical order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Usage count per category in alphabetical order
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// How many records use a category (exact match)
    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.counts.contains_key(category)
    }

    /// The category with the highest usage; ties go to the alphabetically first
    pub fn most_used(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (name, &count) in &self.counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((name.as_str(), count));
            }
        }
        best.map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, Money, NewExpense};
    use chrono::NaiveDate;

    fn expense(id: u64, category: &str) -> Expense {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let input = NewExpense::new("Item", Money::from_cents(100), category);
        Expense::from_input(ExpenseId::new(id), input, today).unwrap()
    }

    #[test]
    fn test_rebuild() {
        let expenses = vec![
            expense(1, "Food"),
            expense(2, "Transport"),
            expense(3, "Food"),
        ];
        let index = CategoryIndex::rebuild(&expenses);

        assert_eq!(index.len(), 2);
        assert_eq!(index.count("Food"), 2);
        assert_eq!(index.count("Transport"), 1);
        assert_eq!(index.count("Rent"), 0);
        assert_eq!(index.categories().collect::<Vec<_>>(), vec!["Food", "Transport"]);
    }

    #[test]
    fn test_most_used() {
        assert_eq!(CategoryIndex::default().most_used(), None);

        let expenses = vec![expense(1, "Transport"), expense(2, "Food"), expense(3, "Food")];
        assert_eq!(CategoryIndex::rebuild(&expenses).most_used(), Some("Food"));
    }

    #[test]
    fn test_most_used_tie_goes_to_first_alphabetically() {
        let expenses = vec![expense(1, "Transport"), expense(2, "Food")];
        assert_eq!(CategoryIndex::rebuild(&expenses).most_used(), Some("Food"));
    }
}
