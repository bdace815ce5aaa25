//! Insight Engine - heuristic observations about a book
//!
//! The engine normalizes a book's entries into an owned working copy and runs a
//! fixed sequence of analyzers over it. Each analyzer emits at most one
//! human-readable line; the result is capped at [`MAX_INSIGHTS`].
//!
//! ## Built-in insights (in output order)
//!
//! - **Totals** - income, expense, and balance
//! - **Top Categories** - three most frequent expense categories
//! - **Largest Expense** - biggest single expense
//! - **Average Expense** - mean expense amount
//! - **Recurring Categories** - categories with 3+ expenses
//! - **Monthly Trend** - last month vs the month before
//! - **Balance Tip** - savings or budgeting advice
//!
//! ## Usage
//!
//! ```rust
//! use khata_core::insights::generate_insights;
//! use khata_core::models::RawTransaction;
//!
//! let insights = generate_insights(&[RawTransaction::income(1000.0)]);
//! assert!(insights[0].starts_with("Total income"));
//! ```

pub mod balance;
pub mod categories;
pub mod engine;
pub mod expenses;
pub mod trend;
pub mod types;

pub use balance::{BalanceTipInsight, Totals, TotalsInsight};
pub use categories::{CategoryCounts, RecurringCategoriesInsight, TopCategoriesInsight};
pub use engine::{generate_insights, AnalysisContext, Insight, InsightEngine};
pub use expenses::{AverageExpenseInsight, LargestExpenseInsight};
pub use trend::{MonthChange, MonthlyTrendInsight};
pub use types::{Finding, InsightConfig, InsightKind, MAX_INSIGHTS, NO_TRANSACTIONS_MESSAGE};
