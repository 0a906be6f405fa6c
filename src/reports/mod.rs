//! Reports module for the expense tracker
//!
//! Provides the summary and analytics report over the expense collection.

pub mod summary;

pub use summary::{
    CategorySummary, MonthSummary, PaymentMethodSummary, RecurringProjection, Summary,
};
