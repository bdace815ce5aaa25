//! Insight Engine - runs the registered analyzers over one book's entries

use chrono::{DateTime, Utc};

use crate::models::{RawTransaction, Transaction};
use crate::normalize::normalize_all;

use super::balance::{BalanceTipInsight, Totals, TotalsInsight};
use super::categories::{CategoryCounts, RecurringCategoriesInsight, TopCategoriesInsight};
use super::expenses::{AverageExpenseInsight, LargestExpenseInsight};
use super::trend::MonthlyTrendInsight;
use super::types::{Finding, InsightConfig, InsightKind, MAX_INSIGHTS, NO_TRANSACTIONS_MESSAGE};

/// Normalized entries plus the aggregates most analyzers need
pub struct AnalysisContext<'a> {
    /// Owned, normalized copy of the input
    pub transactions: Vec<Transaction>,
    /// Income, expense, and balance over `transactions`
    pub totals: Totals,
    /// Expense category frequencies in first-seen order
    pub categories: CategoryCounts,
    pub config: &'a InsightConfig,
}

impl<'a> AnalysisContext<'a> {
    /// Normalize `raw` and precompute aggregates
    ///
    /// `now` is used for records without a date.
    pub fn new(raw: &[RawTransaction], config: &'a InsightConfig, now: DateTime<Utc>) -> Self {
        let transactions = normalize_all(raw, now);
        let totals = Totals::from_transactions(&transactions);
        let categories = CategoryCounts::from_categories(
            transactions
                .iter()
                .filter(|t| t.entry_type.is_expense())
                .map(|t| t.category.as_str()),
        );

        Self {
            transactions,
            totals,
            categories,
            config,
        }
    }

    /// Entries labeled exactly `Expense`, in input order
    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.entry_type.is_expense())
    }

    pub fn has_expenses(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// A single heuristic over a book's entries
pub trait Insight: Send + Sync {
    /// Which kind of finding this analyzer emits
    fn kind(&self) -> InsightKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Produce at most one finding
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<Finding>;
}

/// Runs analyzers in registration order and caps the output
pub struct InsightEngine {
    insights: Vec<Box<dyn Insight>>,
    config: InsightConfig,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in analyzers and default formatting
    pub fn new() -> Self {
        Self::with_config(InsightConfig::default())
    }

    /// Create an engine with the built-in analyzers
    pub fn with_config(config: InsightConfig) -> Self {
        let mut engine = Self {
            insights: vec![],
            config,
        };

        // Registration order is output order
        engine.register(Box::new(TotalsInsight));
        engine.register(Box::new(TopCategoriesInsight));
        engine.register(Box::new(LargestExpenseInsight));
        engine.register(Box::new(AverageExpenseInsight));
        engine.register(Box::new(RecurringCategoriesInsight));
        engine.register(Box::new(MonthlyTrendInsight));
        engine.register(Box::new(BalanceTipInsight));

        engine
    }

    /// Append an analyzer after the existing ones
    pub fn register(&mut self, insight: Box<dyn Insight>) {
        self.insights.push(insight);
    }

    /// Analyze a book's entries
    pub fn analyze(&self, transactions: &[RawTransaction]) -> Vec<Finding> {
        self.analyze_at(transactions, Utc::now())
    }

    /// Analyze with an explicit clock, used for records that have no date
    pub fn analyze_at(&self, transactions: &[RawTransaction], now: DateTime<Utc>) -> Vec<Finding> {
        if transactions.is_empty() {
            return vec![Finding::new(InsightKind::Empty, NO_TRANSACTIONS_MESSAGE)];
        }

        let ctx = AnalysisContext::new(transactions, &self.config, now);
        let mut findings = Vec::with_capacity(MAX_INSIGHTS);

        for insight in &self.insights {
            if findings.len() == MAX_INSIGHTS {
                tracing::debug!(
                    skipped = insight.kind().as_str(),
                    "Insight cap reached"
                );
                break;
            }
            if let Some(finding) = insight.analyze(&ctx) {
                tracing::trace!(insight = insight.name(), "Insight emitted");
                findings.push(finding);
            }
        }

        tracing::debug!(
            transactions = ctx.transactions.len(),
            insights = findings.len(),
            "Insight analysis complete"
        );

        findings
    }

    /// Analyze and keep only the messages
    pub fn generate(&self, transactions: &[RawTransaction]) -> Vec<String> {
        self.analyze(transactions)
            .into_iter()
            .map(|f| f.message)
            .collect()
    }

    /// Kinds of the registered analyzers, in order
    pub fn insight_kinds(&self) -> Vec<InsightKind> {
        self.insights.iter().map(|i| i.kind()).collect()
    }
}

/// Generate insight messages with default formatting
pub fn generate_insights(transactions: &[RawTransaction]) -> Vec<String> {
    InsightEngine::new().generate(transactions)
}
