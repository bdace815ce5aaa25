//! Expense category frequency insights
//!
//! Counts are kept in first-seen order so rankings and listings never depend on
//! hash iteration order.

use std::collections::HashMap;

use super::engine::{AnalysisContext, Insight};
use super::types::{Finding, InsightKind};

/// How many categories the top-categories line lists
pub const TOP_CATEGORY_LIMIT: usize = 3;

/// Occurrences at which a category counts as recurring
pub const RECURRING_THRESHOLD: usize = 3;

/// Order-preserving category frequency table
#[derive(Debug, Clone, Default)]
pub struct CategoryCounts {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl CategoryCounts {
    pub fn from_categories<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        let mut table = Self::default();
        for category in categories {
            table.record(category);
        }
        table
    }

    pub fn record(&mut self, category: &str) {
        match self.index.get(category) {
            Some(&pos) => self.counts[pos].1 += 1,
            None => {
                self.index.insert(category.to_string(), self.counts.len());
                self.counts.push((category.to_string(), 1));
            }
        }
    }

    #[cfg(test)]
    fn count(&self, category: &str) -> usize {
        self.index
            .get(category)
            .map(|&pos| self.counts[pos].1)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// All categories with their counts, in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(c, n)| (c.as_str(), *n))
    }

    /// The `n` most frequent categories; ties keep first-seen order
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Categories seen at least `threshold` times, in first-seen order
    pub fn at_least(&self, threshold: usize) -> Vec<&str> {
        self.iter()
            .filter(|(_, n)| *n >= threshold)
            .map(|(c, _)| c)
            .collect()
    }
}

pub struct TopCategoriesInsight;

impl Insight for TopCategoriesInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::TopCategories
    }

    fn name(&self) -> &'static str {
        "Top Categories"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<Finding> {
        if ctx.categories.is_empty() {
            return None;
        }

        let listing = ctx
            .categories
            .top(TOP_CATEGORY_LIMIT)
            .iter()
            .map(|(category, n)| format!("{} ({} tx)", category, n))
            .collect::<Vec<_>>()
            .join(", ");

        Some(Finding::new(
            InsightKind::TopCategories,
            format!("Top expense categories: {}.", listing),
        ))
    }
}

pub struct RecurringCategoriesInsight;

impl Insight for RecurringCategoriesInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::RecurringCategories
    }

    fn name(&self) -> &'static str {
        "Recurring Categories"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<Finding> {
        let recurring = ctx.categories.at_least(RECURRING_THRESHOLD);
        if recurring.is_empty() {
            return None;
        }

        Some(Finding::new(
            InsightKind::RecurringCategories,
            format!(
                "Recurring expense categories detected: {} - review subscriptions/regular bills.",
                recurring.join(", ")
            ),
        ))
    }
}
