//! Core types for the Insight Engine

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::normalize::{display_offset, DEFAULT_UTC_OFFSET_MINUTES};

/// Hard cap on insights returned per analysis
pub const MAX_INSIGHTS: usize = 8;

/// Message returned for a book with no entries
pub const NO_TRANSACTIONS_MESSAGE: &str = "No transactions recorded yet.";

/// Kinds of observation the engine can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Book has no entries at all
    Empty,
    /// Income, expense, and balance totals
    Totals,
    /// Most frequent expense categories
    TopCategories,
    /// Single largest expense
    LargestExpense,
    /// Mean expense amount
    AverageExpense,
    /// Expense categories seen three or more times
    RecurringCategories,
    /// Last month vs the month before
    MonthlyTrend,
    /// Savings or budgeting advice
    BalanceTip,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Empty => "empty",
            InsightKind::Totals => "totals",
            InsightKind::TopCategories => "top_categories",
            InsightKind::LargestExpense => "largest_expense",
            InsightKind::AverageExpense => "average_expense",
            InsightKind::RecurringCategories => "recurring_categories",
            InsightKind::MonthlyTrend => "monthly_trend",
            InsightKind::BalanceTip => "balance_tip",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty" => Ok(InsightKind::Empty),
            "totals" => Ok(InsightKind::Totals),
            "top_categories" => Ok(InsightKind::TopCategories),
            "largest_expense" => Ok(InsightKind::LargestExpense),
            "average_expense" => Ok(InsightKind::AverageExpense),
            "recurring_categories" => Ok(InsightKind::RecurringCategories),
            "monthly_trend" => Ok(InsightKind::MonthlyTrend),
            "balance_tip" => Ok(InsightKind::BalanceTip),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// One display-ready observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: InsightKind,
    pub message: String,
}

impl Finding {
    pub fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Formatting settings for insight messages
#[derive(Debug, Clone, PartialEq)]
pub struct InsightConfig {
    /// Prefix for every money amount
    pub currency_symbol: String,
    /// Timezone used for month buckets and printed timestamps
    pub display_offset: FixedOffset,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            display_offset: display_offset(DEFAULT_UTC_OFFSET_MINUTES),
        }
    }
}

impl InsightConfig {
    /// Format an amount with the currency symbol and two decimals
    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}
