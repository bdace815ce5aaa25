//! Totals and balance advice

use serde::Serialize;

use crate::models::{BookSummary, Transaction};

use super::engine::{AnalysisContext, Insight};
use super::types::{Finding, InsightKind};

pub const POSITIVE_BALANCE_TIP: &str =
    "You're positive - consider automating a percentage of income to savings.";
pub const NEGATIVE_BALANCE_TIP: &str =
    "Expenses exceed income - consider trimming top categories or setting a budget.";

/// Income, expense, and their difference
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl Totals {
    /// Sum normalized entries; entries that are neither income nor expense are ignored
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let income: f64 = transactions
            .iter()
            .filter(|t| t.entry_type.is_income())
            .map(|t| t.amount)
            .sum();
        let expense: f64 = transactions
            .iter()
            .filter(|t| t.entry_type.is_expense())
            .map(|t| t.amount)
            .sum();

        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

impl From<Totals> for BookSummary {
    fn from(totals: Totals) -> Self {
        Self {
            income: totals.income,
            expense: totals.expense,
            total: totals.balance,
        }
    }
}

pub struct TotalsInsight;

impl Insight for TotalsInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::Totals
    }

    fn name(&self) -> &'static str {
        "Totals"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<Finding> {
        let totals = ctx.totals;
        Some(Finding::new(
            InsightKind::Totals,
            format!(
                "Total income: {} | Total expense: {} | Balance: {}",
                ctx.config.money(totals.income),
                ctx.config.money(totals.expense),
                ctx.config.money(totals.balance)
            ),
        ))
    }
}

/// Always emits one of two fixed tips
pub struct BalanceTipInsight;

impl Insight for BalanceTipInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::BalanceTip
    }

    fn name(&self) -> &'static str {
        "Balance Tip"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<Finding> {
        let tip = if ctx.totals.balance > 0.0 {
            POSITIVE_BALANCE_TIP
        } else {
            NEGATIVE_BALANCE_TIP
        };
        Some(Finding::new(InsightKind::BalanceTip, tip))
    }
}
