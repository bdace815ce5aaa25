//! Largest and average expense

use crate::models::Transaction;
use crate::normalize::format_timestamp;

use super::engine::{AnalysisContext, Insight};
use super::types::{Finding, InsightKind};

/// First expense holding the maximum amount
pub fn largest_expense<'a>(
    expenses: impl Iterator<Item = &'a Transaction>,
) -> Option<&'a Transaction> {
    expenses.fold(None, |best: Option<&'a Transaction>, t| match best {
        Some(b) if b.amount >= t.amount => Some(b),
        _ => Some(t),
    })
}

pub struct LargestExpenseInsight;

impl Insight for LargestExpenseInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::LargestExpense
    }

    fn name(&self) -> &'static str {
        "Largest Expense"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<Finding> {
        let largest = largest_expense(ctx.expenses())?;

        Some(Finding::new(
            InsightKind::LargestExpense,
            format!(
                "Largest single expense: {} - {} in {} on {}.",
                ctx.config.money(largest.amount),
                largest.description,
                largest.category,
                format_timestamp(largest.date, ctx.config.display_offset)
            ),
        ))
    }
}

pub struct AverageExpenseInsight;

impl Insight for AverageExpenseInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::AverageExpense
    }

    fn name(&self) -> &'static str {
        "Average Expense"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<Finding> {
        let (sum, count) = ctx
            .expenses()
            .fold((0.0, 0usize), |(sum, count), t| (sum + t.amount, count + 1));
        if count == 0 {
            return None;
        }

        Some(Finding::new(
            InsightKind::AverageExpense,
            format!(
                "Average expense per transaction: {}.",
                ctx.config.money(sum / count as f64)
            ),
        ))
    }
}
