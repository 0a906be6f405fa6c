//! Expense identifiers and the allocator that issues them
//!
//! Identifiers are small positive integers shown to the user in every table,
//! so they are wrapped in a newtype rather than passed around as bare `u64`s.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};

/// Identifier of a single expense record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(u64);

impl ExpenseId {
    /// Largest identifier the ledger will issue or load
    pub const MAX: ExpenseId = ExpenseId(i32::MAX as u64);

    /// Wrap a raw identifier value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the underlying integer
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ExpenseId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for ExpenseId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        Ok(Self(s.parse()?))
    }
}

/// Monotonic identifier source owned by a store
///
/// Every issued value is strictly greater than anything issued or observed
/// before it. Deleting a record never makes its identifier available again.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// Create an allocator whose first identifier will be 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator seeded from the highest identifier already in use
    pub fn seeded_from<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ExpenseId>,
    {
        let mut allocator = Self::new();
        for id in ids {
            allocator.observe(id);
        }
        allocator
    }

    /// The identifier `next_id` would issue, without issuing it
    ///
    /// Fails once [`ExpenseId::MAX`] has been reached.
    pub fn peek(&self) -> LedgerResult<ExpenseId> {
        self.last
            .checked_add(1)
            .filter(|&next| next <= ExpenseId::MAX.0)
            .map(ExpenseId)
            .ok_or_else(|| {
                LedgerError::Validation(format!(
                    "No expense identifiers left (maximum is {})",
                    ExpenseId::MAX
                ))
            })
    }

    /// Issue the next identifier
    pub fn next_id(&mut self) -> LedgerResult<ExpenseId> {
        let id = self.peek()?;
        self.last = id.0;
        Ok(id)
    }

    /// Record an identifier that entered the store from elsewhere
    pub fn observe(&mut self, id: ExpenseId) {
        self.last = self.last.max(id.0);
    }

    /// The highest identifier issued or observed so far (0 if none)
    pub fn last_issued(&self) -> u64 {
        self.last
    }
}
