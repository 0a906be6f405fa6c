//! In-memory expense store
//!
//! Owns the ordered record sequence, the derived category index, the
//! identifier allocator and the undo/redo history. Every mutation takes
//! exactly one history checkpoint, and only once it is known to succeed.

pub mod history;
pub mod index;
pub mod query;

pub use history::{History, DEFAULT_HISTORY_CAPACITY};
pub use index::CategoryIndex;
pub use query::{ExpenseFilter, SortKey};

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};

use crate::error::{LedgerError, LedgerResult};
use crate::models::date::today;
use crate::models::{Expense, ExpenseField, ExpenseId, ExpenseUpdate, IdAllocator, NewExpense};
use crate::reports::Summary;

/// The expense collection and everything derived from it
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
    index: CategoryIndex,
    ids: IdAllocator,
    history: History<Vec<Expense>>,
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseStore {
    /// Create an empty store with the default history capacity
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty store keeping `capacity` snapshots per history stack
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            expenses: Vec::new(),
            index: CategoryIndex::default(),
            ids: IdAllocator::new(),
            history: History::new(capacity),
        }
    }

    /// Create a store from previously persisted records
    ///
    /// Records keep their identifiers and order. The allocator is seeded from
    /// the highest identifier so new records never collide with loaded ones.
    pub fn from_records(records: Vec<Expense>, capacity: usize) -> LedgerResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            record.validate()?;
            if !seen.insert(record.id) {
                return Err(LedgerError::Validation(format!(
                    "Duplicate expense id {}",
                    record.id
                )));
            }
        }

        let mut store = Self::with_history_capacity(capacity);
        store.ids = IdAllocator::seeded_from(records.iter().map(|e| e.id));
        store.expenses = records;
        store.refresh_index();
        Ok(store)
    }

    // Mutations

    /// Add a new expense dated today unless the input carries a date
    pub fn add(&mut self, input: NewExpense) -> LedgerResult<Expense> {
        self.add_on(input, today())
    }

    /// Add a new expense, using `today` when the input carries no date
    pub fn add_on(&mut self, input: NewExpense, today: NaiveDate) -> LedgerResult<Expense> {
        // Validate before issuing so a rejected add burns no identifier
        let expense = Expense::from_input(self.ids.peek()?, input, today)?;
        self.ids.next_id()?;

        self.checkpoint();
        self.expenses.push(expense.clone());
        self.refresh_index();
        Ok(expense)
    }

    /// Change a single field from raw text input
    ///
    /// On invalid input the record is left exactly as it was.
    pub fn update(&mut self, id: ExpenseId, field: ExpenseField, value: &str) -> LedgerResult<Expense> {
        self.position(id)?;
        let update = ExpenseUpdate::from_field(field, value)?;
        self.update_many(id, &update)
    }

    /// Apply several field changes as one mutation (one undo step)
    pub fn update_many(&mut self, id: ExpenseId, update: &ExpenseUpdate) -> LedgerResult<Expense> {
        let position = self.position(id)?;
        if update.is_empty() {
            return Err(LedgerError::Validation("No changes given".into()));
        }
        let updated = update.apply_to(&self.expenses[position])?;

        self.checkpoint();
        self.expenses[position] = updated.clone();
        self.refresh_index();
        Ok(updated)
    }

    /// Remove an expense, returning it
    pub fn delete(&mut self, id: ExpenseId) -> LedgerResult<Expense> {
        let position = self.position(id)?;

        self.checkpoint();
        let removed = self.expenses.remove(position);
        self.refresh_index();
        Ok(removed)
    }

    /// Copy an expense under a fresh identifier, dated today
    pub fn duplicate(&mut self, id: ExpenseId) -> LedgerResult<Expense> {
        self.duplicate_on(id, today())
    }

    /// Copy an expense under a fresh identifier, dated `today`
    pub fn duplicate_on(&mut self, id: ExpenseId, today: NaiveDate) -> LedgerResult<Expense> {
        let position = self.position(id)?;
        let copy = self.expenses[position].duplicate(self.ids.next_id()?, today);

        self.checkpoint();
        self.expenses.push(copy.clone());
        self.refresh_index();
        Ok(copy)
    }

    /// Remove every expense; returns how many were removed
    ///
    /// Confirmation is the caller's job. Clearing an empty store still counts
    /// as a mutation and can be undone.
    pub fn clear(&mut self) -> usize {
        self.checkpoint();
        let removed = self.expenses.len();
        self.expenses.clear();
        self.refresh_index();
        removed
    }

    /// Roll back the most recent mutation
    pub fn undo(&mut self) -> LedgerResult<()> {
        let previous = self.history.undo(self.expenses.clone())?;
        self.restore(previous);
        Ok(())
    }

    /// Re-apply the most recently undone mutation
    pub fn redo(&mut self) -> LedgerResult<()> {
        let next = self.history.redo(self.expenses.clone())?;
        self.restore(next);
        Ok(())
    }

    // Queries

    /// Look up an expense by identifier
    pub fn find(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Look up an expense by identifier, failing if it does not exist
    pub fn get(&self, id: ExpenseId) -> LedgerResult<&Expense> {
        self.find(id).ok_or_else(|| LedgerError::expense_not_found(id))
    }

    /// Records in insertion order
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// A sorted copy of all records
    pub fn list(&self, sort: SortKey) -> Vec<Expense> {
        let mut listing = self.expenses.clone();
        sort.sort(&mut listing);
        listing
    }

    /// Records matching every criterion of the filter, in insertion order
    pub fn search(&self, filter: &ExpenseFilter) -> Vec<Expense> {
        self.search_by(|e| filter.matches(e))
    }

    /// Records satisfying an arbitrary predicate, in insertion order
    pub fn search_by<P>(&self, predicate: P) -> Vec<Expense>
    where
        P: Fn(&Expense) -> bool,
    {
        self.expenses.iter().filter(|e| predicate(e)).cloned().collect()
    }

    /// Totals and breakdowns over the whole collection
    pub fn aggregate(&self) -> Summary {
        Summary::compute(&self.expenses)
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.index
    }

    /// Category with the most records, if any
    pub fn most_used_category(&self) -> Option<&str> {
        self.index.most_used()
    }

    /// Distinct payment methods in alphabetical order
    pub fn payment_methods(&self) -> BTreeSet<&str> {
        self.expenses
            .iter()
            .map(|e| e.payment_method.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Highest identifier issued or loaded so far
    pub fn last_id(&self) -> u64 {
        self.ids.last_issued()
    }

    fn position(&self, id: ExpenseId) -> LedgerResult<usize> {
        self.expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LedgerError::expense_not_found(id))
    }

    fn checkpoint(&mut self) {
        self.history.checkpoint(self.expenses.clone());
    }

    fn restore(&mut self, snapshot: Vec<Expense>) {
        self.expenses = snapshot;
        // Identifiers stay monotonic across undo: never rewind the allocator
        for expense in &self.expenses {
            self.ids.observe(expense.id);
        }
        self.refresh_index();
    }

    fn refresh_index(&mut self) {
        self.index = CategoryIndex::rebuild(&self.expenses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lunch() -> NewExpense {
        NewExpense::new("Lunch", Money::from_cents(1250), "Food").date(date(2024, 3, 15))
    }

    fn item(desc: &str, cents: i64, category: &str) -> NewExpense {
        NewExpense::new(desc, Money::from_cents(cents), category).date(date(2024, 3, 1))
    }

    #[test]
    fn test_add_then_list() {
        let mut store = ExpenseStore::new();
        let created = store.add(lunch()).unwrap();

        let listing = store.list(SortKey::Insertion);
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0], created);
        assert_eq!(created.id, ExpenseId::new(1));
        assert_eq!(created.description, "Lunch");
        assert_eq!(created.amount, Money::from_cents(1250));
        assert_eq!(created.category, "Food");
        assert_eq!(created.date, date(2024, 3, 15));
        assert_eq!(store.aggregate().total, Money::from_cents(1250));
    }

    #[test]
    fn test_invalid_add_is_rejected_without_side_effects() {
        let mut store = ExpenseStore::new();
        let err = store.add(item("Lunch", 0, "Food")).unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty());
        assert!(!store.can_undo());

        // The rejected add did not consume an identifier
        assert_eq!(store.add(lunch()).unwrap().id, ExpenseId::new(1));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut store = ExpenseStore::new();
        let mut issued = Vec::new();
        for round in 0..5 {
            let a = store.add(item("A", 100, "Food")).unwrap();
            let b = store.add(item("B", 200, "Food")).unwrap();
            issued.push(a.id);
            issued.push(b.id);
            if round % 2 == 0 {
                store.delete(b.id).unwrap();
            }
        }
        assert!(issued.windows(2).all(|w| w[0] < w[1]));

        // Deleting the newest record does not free its id
        let last = store.add(item("C", 300, "Food")).unwrap();
        store.delete(last.id).unwrap();
        assert!(store.add(item("D", 400, "Food")).unwrap().id > last.id);
    }

    #[test]
    fn test_update_with_invalid_amount_leaves_record_unchanged() {
        let mut store = ExpenseStore::new();
        let created = store.add(lunch()).unwrap();
        let depth = store.undo_depth();

        for bad in ["-5", "0", "abc"] {
            assert!(store.update(created.id, ExpenseField::Amount, bad).is_err());
        }
        assert_eq!(store.get(created.id).unwrap().amount, Money::from_cents(1250));
        assert_eq!(store.undo_depth(), depth);
    }

    #[test]
    fn test_update_field() {
        let mut store = ExpenseStore::new();
        let created = store.add(lunch()).unwrap();

        let updated = store
            .update(created.id, ExpenseField::Category, "Dining")
            .unwrap();
        assert_eq!(updated.category, "Dining");
        assert_eq!(updated.id, created.id);
        assert!(store.categories().contains("Dining"));
        assert!(!store.categories().contains("Food"));
    }

    #[test]
    fn test_update_many_is_one_undo_step() {
        let mut store = ExpenseStore::new();
        let created = store.add(lunch()).unwrap();
        let update = ExpenseUpdate {
            description: Some("Dinner".into()),
            amount: Some(Money::from_cents(3000)),
            ..ExpenseUpdate::default()
        };
        store.update_many(created.id, &update).unwrap();
        assert_eq!(store.undo_depth(), 2);

        store.undo().unwrap();
        assert_eq!(store.get(created.id).unwrap(), &created);
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let mut store = ExpenseStore::new();
        store.add(lunch()).unwrap();
        let missing = ExpenseId::new(99);

        assert!(store.find(missing).is_none());
        assert!(store.get(missing).unwrap_err().is_not_found());
        assert!(store.delete(missing).unwrap_err().is_not_found());
        assert!(store.duplicate(missing).unwrap_err().is_not_found());
        assert!(store
            .update(missing, ExpenseField::Amount, "5")
            .unwrap_err()
            .is_not_found());
        assert_eq!(store.undo_depth(), 1);
    }

    #[test]
    fn test_duplicate() {
        let mut store = ExpenseStore::new();
        let original = store.add(lunch()).unwrap();
        let copy = store.duplicate_on(original.id, date(2024, 6, 1)).unwrap();

        assert_eq!(copy.id, ExpenseId::new(2));
        assert_eq!(copy.description, "Lunch (Copy)");
        assert_eq!(copy.date, date(2024, 6, 1));
        assert_eq!(copy.amount, original.amount);
        assert_eq!(store.len(), 2);
        assert_eq!(store.categories().count("Food"), 2);
    }

    #[test]
    fn test_undo_delete_restores_record() {
        let mut store = ExpenseStore::new();
        let created = store.add(lunch()).unwrap();
        store.delete(created.id).unwrap();
        assert!(store.is_empty());

        store.undo().unwrap();
        assert_eq!(store.expenses(), &[created.clone()]);
        assert_eq!(store.categories().count("Food"), 1);

        store.redo().unwrap();
        assert!(store.is_empty());
        assert!(store.categories().is_empty());
    }

    #[test]
    fn test_undo_redo_of_add_round_trips() {
        let mut store = ExpenseStore::new();
        store.add(item("Bus", 250, "Transport")).unwrap();
        let before = store.expenses().to_vec();

        store.add(lunch()).unwrap();
        let after = store.expenses().to_vec();

        store.undo().unwrap();
        assert_eq!(store.expenses(), before.as_slice());
        store.redo().unwrap();
        assert_eq!(store.expenses(), after.as_slice());
    }

    #[test]
    fn test_undo_redo_on_empty_history() {
        let mut store = ExpenseStore::new();
        assert!(store.undo().unwrap_err().is_empty_history());
        assert!(store.redo().unwrap_err().is_empty_history());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut store = ExpenseStore::new();
        for i in 0..25 {
            store.add(item(&format!("Item {}", i), 100 + i, "Misc")).unwrap();
        }
        assert_eq!(store.undo_depth(), 20);

        let mut undone = 0;
        while store.undo().is_ok() {
            undone += 1;
        }
        assert_eq!(undone, 20);
        // The five oldest adds can no longer be undone
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut store = ExpenseStore::new();
        store.add(lunch()).unwrap();
        store.add(item("Bus", 250, "Transport")).unwrap();
        store.undo().unwrap();
        assert!(store.can_redo());

        store.add(item("Tea", 300, "Food")).unwrap();
        assert!(!store.can_redo());
        assert_eq!(store.redo_depth(), 0);
    }

    #[test]
    fn test_ids_stay_unique_after_undo() {
        let mut store = ExpenseStore::new();
        let first = store.add(lunch()).unwrap();
        store.undo().unwrap();
        let second = store.add(lunch()).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_clear() {
        let mut store = ExpenseStore::new();
        store.add(lunch()).unwrap();
        store.add(item("Bus", 250, "Transport")).unwrap();

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert!(store.categories().is_empty());

        store.undo().unwrap();
        assert_eq!(store.len(), 2);

        let mut empty = ExpenseStore::new();
        assert_eq!(empty.clear(), 0);
        assert!(empty.can_undo());
    }

    #[test]
    fn test_read_operations_never_checkpoint() {
        let mut store = ExpenseStore::new();
        store.add(lunch()).unwrap();
        let depth = store.undo_depth();

        store.list(SortKey::DateDesc);
        store.search(&ExpenseFilter::new().category("Food"));
        store.aggregate();
        store.find(ExpenseId::new(1));
        assert_eq!(store.undo_depth(), depth);
    }

    #[test]
    fn test_search_uses_and_semantics() {
        let mut store = ExpenseStore::new();
        store.add(item("Lunch", 1250, "Food")).unwrap();
        store.add(item("Snack", 300, "Food")).unwrap();
        store.add(item("Taxi", 2000, "Transport")).unwrap();

        let filter = ExpenseFilter::new()
            .category("Food")
            .min_amount(Money::from_cents(1000));
        let found = store.search(&filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "Lunch");

        let unfiltered = ExpenseFilter::new().category("").description("");
        assert_eq!(store.search(&unfiltered).len(), 3);
    }

    #[test]
    fn test_derived_index_tracks_every_mutation() {
        let mut store = ExpenseStore::new();
        let a = store.add(item("A", 100, "Food")).unwrap();
        store.add(item("B", 100, "Transport")).unwrap();
        store.add(item("C", 100, "Transport")).unwrap();
        assert_eq!(store.most_used_category(), Some("Transport"));

        store.delete(a.id).unwrap();
        assert_eq!(store.categories(), &CategoryIndex::rebuild(store.expenses()));
        store.undo().unwrap();
        assert_eq!(store.categories(), &CategoryIndex::rebuild(store.expenses()));
    }

    #[test]
    fn test_from_records_seeds_allocator() {
        let today = date(2024, 1, 1);
        let records = vec![
            Expense::from_input(ExpenseId::new(4), item("A", 100, "Food"), today).unwrap(),
            Expense::from_input(ExpenseId::new(9), item("B", 100, "Food"), today).unwrap(),
        ];
        let mut store = ExpenseStore::from_records(records, 20).unwrap();
        assert_eq!(store.last_id(), 9);
        assert!(!store.can_undo());
        assert_eq!(store.add(lunch()).unwrap().id, ExpenseId::new(10));
    }

    #[test]
    fn test_exhausted_identifiers_reject_add_and_duplicate() {
        let today = date(2024, 1, 1);
        let top = Expense::from_input(ExpenseId::MAX, item("Top", 100, "Food"), today).unwrap();
        let mut store = ExpenseStore::from_records(vec![top], 20).unwrap();

        assert!(store.add(lunch()).unwrap_err().is_validation());
        assert!(store.duplicate(ExpenseId::MAX).unwrap_err().is_validation());
        assert_eq!(store.len(), 1);
        assert!(!store.can_undo());
        assert_eq!(store.last_id(), ExpenseId::MAX.value());
    }

    #[test]
    fn test_from_records_rejects_out_of_range_ids() {
        let today = date(2024, 1, 1);
        let mut record = Expense::from_input(ExpenseId::new(1), item("A", 100, "Food"), today).unwrap();
        record.id = ExpenseId::new(ExpenseId::MAX.value() + 1);
        assert!(ExpenseStore::from_records(vec![record], 20).is_err());
    }

    #[test]
    fn test_from_records_rejects_duplicate_ids() {
        let today = date(2024, 1, 1);
        let a = Expense::from_input(ExpenseId::new(1), item("A", 100, "Food"), today).unwrap();
        let b = a.clone();
        assert!(ExpenseStore::from_records(vec![a, b], 20).is_err());
    }

    #[test]
    fn test_payment_methods() {
        let mut store = ExpenseStore::new();
        store.add(item("A", 100, "Food").payment_method("Card")).unwrap();
        store.add(item("B", 100, "Food")).unwrap();
        store.add(item("C", 100, "Food").payment_method("Card")).unwrap();
        assert_eq!(
            store.payment_methods().into_iter().collect::<Vec<_>>(),
            vec!["Card", "Cash"]
        );
    }
}
