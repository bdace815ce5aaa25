//! Domain models for Khata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category used when an entry has none
pub const DEFAULT_CATEGORY: &str = "📦 Other";

/// Categories every new book starts with
pub const DEFAULT_CATEGORIES: [&str; 11] = [
    "🍱 Food",
    "✈️ Travel",
    "💡 Bills",
    "🛍️ Shopping",
    "💊 Health",
    "📚 Education",
    "💰 Salary",
    "🎮 Entertainment",
    "🏠 Rent",
    "🧾 Groceries",
    DEFAULT_CATEGORY,
];

/// Form value that asks for the custom category text to be used instead
pub const CUSTOM_CATEGORY_MARKER: &str = "__custom__";

/// Whether money came in or went out
///
/// Labels are matched exactly. Anything other than `Income` or `Expense` is kept
/// verbatim as `Other` and counts toward neither total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    Income,
    #[default]
    Expense,
    Other(String),
}

impl EntryType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Income" => Self::Income,
            "Expense" => Self::Expense,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense)
    }
}

impl From<String> for EntryType {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<EntryType> for String {
    fn from(entry_type: EntryType) -> Self {
        entry_type.as_str().to_string()
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An amount as it was stored or submitted, before coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl From<f64> for RawAmount {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A transaction record as read from storage
///
/// Every field may be missing or malformed. Use [`Transaction::normalize`] to get
/// a working copy with safe defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub amount: Option<RawAmount>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl RawTransaction {
    pub fn new(entry_type: &str, amount: impl Into<RawAmount>) -> Self {
        Self {
            entry_type: Some(entry_type.to_string()),
            amount: Some(amount.into()),
            ..Default::default()
        }
    }

    pub fn income(amount: f64) -> Self {
        Self::new("Income", amount)
    }

    pub fn expense(amount: f64, category: &str) -> Self {
        Self::new("Expense", amount).with_category(category)
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// A normalized transaction: the insight engine's working copy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// A user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A named ledger owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub username: String,
    pub book_name: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted entry in a book
#[derive(Debug, Clone, Serialize)]
pub struct StoredTransaction {
    pub id: i64,
    pub username: String,
    pub book_name: String,
    #[serde(flatten)]
    pub raw: RawTransaction,
    pub created_at: DateTime<Utc>,
}

/// Per-book totals shown alongside the entry list
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BookSummary {
    pub income: f64,
    pub expense: f64,
    /// Income minus expense
    pub total: f64,
}

/// A resolved entry ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub entry_type: EntryType,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
}

/// Fields written when an entry is edited
///
/// `date` is left untouched when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryUpdate {
    pub entry_type: EntryType,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_labels_are_exact() {
        assert_eq!(EntryType::from_label("Income"), EntryType::Income);
        assert_eq!(EntryType::from_label("Expense"), EntryType::Expense);
        assert_eq!(
            EntryType::from_label("expense"),
            EntryType::Other("expense".to_string())
        );
        assert_eq!(EntryType::from_label("Expense").as_str(), "Expense");
    }

    #[test]
    fn test_raw_transaction_deserializes_loose_amounts() {
        let raw: RawTransaction =
            serde_json::from_str(r#"{"type": "Expense", "amount": "12.50"}"#).unwrap();
        assert_eq!(raw.amount, Some(RawAmount::Text("12.50".to_string())));
        assert!(raw.category.is_none());
        assert!(raw.date.is_none());

        let raw: RawTransaction = serde_json::from_str(r#"{"amount": 7}"#).unwrap();
        assert_eq!(raw.amount, Some(RawAmount::Number(7.0)));
        assert!(raw.entry_type.is_none());
    }

    #[test]
    fn test_default_categories_end_with_sentinel() {
        assert_eq!(DEFAULT_CATEGORIES.last(), Some(&DEFAULT_CATEGORY));
    }
}
