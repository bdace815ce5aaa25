//! Month-over-month expense trend

use std::collections::BTreeMap;

use chrono::FixedOffset;

use crate::models::Transaction;
use crate::normalize::month_key;

use super::engine::{AnalysisContext, Insight};
use super::types::{Finding, InsightKind};

/// Percent change beyond which a month counts as a jump or drop
pub const TREND_THRESHOLD_PCT: f64 = 20.0;

/// Expense totals keyed by `YYYY-MM`; keys sort chronologically
pub fn monthly_expense_totals<'a>(
    expenses: impl Iterator<Item = &'a Transaction>,
    offset: FixedOffset,
) -> BTreeMap<String, f64> {
    let mut by_month = BTreeMap::new();
    for t in expenses {
        *by_month.entry(month_key(t.date, offset)).or_insert(0.0) += t.amount;
    }
    by_month
}

/// Outcome of comparing the two most recent months
#[derive(Debug, Clone, PartialEq)]
pub enum MonthChange {
    Jumped { pct: f64 },
    Dropped { pct: f64 },
    /// Prior month had no positive spending, latest month did
    Appeared,
    /// Within the threshold, or nothing to report
    Steady,
}

/// Compare the last two months of a chronologically sorted table
///
/// Returns `(previous_month, last_month, change)`, or `None` with fewer than two
/// months.
pub fn compare_last_two(by_month: &BTreeMap<String, f64>) -> Option<(&str, &str, MonthChange)> {
    let mut recent = by_month.iter().rev();
    let (last_month, &last) = recent.next()?;
    let (prev_month, &prev) = recent.next()?;

    let change = if prev > 0.0 {
        let pct = (last - prev) / prev * 100.0;
        if pct > TREND_THRESHOLD_PCT {
            MonthChange::Jumped { pct }
        } else if pct < -TREND_THRESHOLD_PCT {
            MonthChange::Dropped { pct: pct.abs() }
        } else {
            MonthChange::Steady
        }
    } else if last > 0.0 {
        MonthChange::Appeared
    } else {
        MonthChange::Steady
    };

    Some((prev_month.as_str(), last_month.as_str(), change))
}

pub struct MonthlyTrendInsight;

impl Insight for MonthlyTrendInsight {
    fn kind(&self) -> InsightKind {
        InsightKind::MonthlyTrend
    }

    fn name(&self) -> &'static str {
        "Monthly Trend"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<Finding> {
        let by_month = monthly_expense_totals(ctx.expenses(), ctx.config.display_offset);
        let (prev, last, change) = compare_last_two(&by_month)?;

        let message = match change {
            MonthChange::Jumped { pct } => {
                format!("Spending jumped by {:.0}% in {} vs {}.", pct, last, prev)
            }
            MonthChange::Dropped { pct } => {
                format!("Spending dropped by {:.0}% in {} vs {}.", pct, last, prev)
            }
            MonthChange::Appeared => format!(
                "Spending appeared in {} (no spending recorded in {}).",
                last, prev
            ),
            MonthChange::Steady => return None,
        };

        Some(Finding::new(InsightKind::MonthlyTrend, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_keys_sort_chronologically_across_years() {
        let by_month = table(&[("2024-01", 50.0), ("2023-12", 100.0), ("2023-11", 5.0)]);
        let (prev, last, change) = compare_last_two(&by_month).unwrap();

        assert_eq!((prev, last), ("2023-12", "2024-01"));
        assert_eq!(change, MonthChange::Dropped { pct: 50.0 });
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let by_month = table(&[("2024-01", 100.0), ("2024-02", 120.0)]);
        assert_eq!(compare_last_two(&by_month).unwrap().2, MonthChange::Steady);

        let by_month = table(&[("2024-01", 100.0), ("2024-02", 80.0)]);
        assert_eq!(compare_last_two(&by_month).unwrap().2, MonthChange::Steady);

        let by_month = table(&[("2024-01", 100.0), ("2024-02", 121.0)]);
        assert!(matches!(
            compare_last_two(&by_month).unwrap().2,
            MonthChange::Jumped { .. }
        ));
    }

    #[test]
    fn test_zero_previous_month() {
        let by_month = table(&[("2024-01", 0.0), ("2024-02", 40.0)]);
        assert_eq!(compare_last_two(&by_month).unwrap().2, MonthChange::Appeared);

        let by_month = table(&[("2024-01", 0.0), ("2024-02", 0.0)]);
        assert_eq!(compare_last_two(&by_month).unwrap().2, MonthChange::Steady);
    }

    #[test]
    fn test_single_month_has_no_comparison() {
        assert!(compare_last_two(&table(&[("2024-01", 10.0)])).is_none());
        assert!(compare_last_two(&BTreeMap::new()).is_none());
    }

    #[test]
    fn test_buckets_sum_per_month() {
        use crate::models::{EntryType, Transaction};
        use crate::normalize::display_offset;
        use chrono::{TimeZone, Utc};

        let tx = |m: u32, amount: f64| Transaction {
            entry_type: EntryType::Expense,
            amount,
            category: "Food".to_string(),
            description: String::new(),
            date: Utc.with_ymd_and_hms(2024, m, 10, 12, 0, 0).unwrap(),
        };
        let txs = [tx(1, 10.0), tx(2, 5.0), tx(1, 15.0)];

        let by_month = monthly_expense_totals(txs.iter(), display_offset(0));

        assert_eq!(by_month, table(&[("2024-01", 25.0), ("2024-02", 5.0)]));
    }
}
