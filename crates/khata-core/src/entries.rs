//! Entry form handling
//!
//! Turns a loosely-typed add/edit payload into a [`NewEntry`] or [`EntryUpdate`].
//! Nothing here rejects input: bad amounts become zero, bad dates become now,
//! and missing categories become [`DEFAULT_CATEGORY`].

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::Result;
use crate::models::{
    Book, EntryType, EntryUpdate, NewEntry, RawAmount, CUSTOM_CATEGORY_MARKER, DEFAULT_CATEGORIES,
    DEFAULT_CATEGORY,
};
use crate::normalize::{coerce_amount, parse_entry_date};

/// Add/edit payload as submitted by a client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryForm {
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<RawAmount>,
    /// Picked category, or `__custom__` to use `custom_category`
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub custom_category: Option<String>,
    /// `YYYY-MM-DD` or an ISO-8601 timestamp
    #[serde(default)]
    pub date: Option<String>,
}

/// A resolved form plus the category to remember on the book, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub new_category: Option<String>,
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl EntryForm {
    /// Missing type means `Expense`
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
            .as_deref()
            .map(EntryType::from_label)
            .unwrap_or_default()
    }

    pub fn amount(&self) -> f64 {
        coerce_amount(self.amount.as_ref())
    }

    pub fn description(&self) -> String {
        self.description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    fn custom_text(&self) -> Option<&str> {
        non_blank(self.custom_category.as_deref())
    }

    /// Category for a new entry; custom text is remembered on the book
    fn add_category(&self) -> (String, Option<String>) {
        let picked = self.category.as_deref().unwrap_or_default();
        let wants_custom = picked == CUSTOM_CATEGORY_MARKER || picked.is_empty();

        match (wants_custom, self.custom_text()) {
            (true, Some(custom)) => (custom.to_string(), Some(custom.to_string())),
            (true, None) => (DEFAULT_CATEGORY.to_string(), None),
            (false, _) => (picked.to_string(), None),
        }
    }

    /// Category for an edit; anything outside the built-in list is remembered
    fn edit_category(&self) -> (String, Option<String>) {
        let picked = non_blank(self.category.as_deref());
        let category = match picked {
            Some(CUSTOM_CATEGORY_MARKER) => self.custom_text(),
            other => other,
        };

        match category {
            Some(c) if DEFAULT_CATEGORIES.contains(&c) => (c.to_string(), None),
            Some(c) => (c.to_string(), Some(c.to_string())),
            None => (DEFAULT_CATEGORY.to_string(), None),
        }
    }

    /// Resolve for insertion; a blank or unparseable date becomes `now`
    pub fn to_new_entry(&self, offset: FixedOffset, now: DateTime<Utc>) -> Resolved<NewEntry> {
        let (category, new_category) = self.add_category();
        let date = self
            .date
            .as_deref()
            .and_then(|d| parse_entry_date(d, offset))
            .unwrap_or(now);

        Resolved {
            value: NewEntry {
                entry_type: self.entry_type(),
                description: self.description(),
                amount: self.amount(),
                category,
                date,
            },
            new_category,
        }
    }

    /// Resolve for an edit; a blank date keeps the stored one, an unparseable one becomes `now`
    pub fn to_update(&self, offset: FixedOffset, now: DateTime<Utc>) -> Resolved<EntryUpdate> {
        let (category, new_category) = self.edit_category();
        let date = non_blank(self.date.as_deref())
            .map(|d| parse_entry_date(d, offset).unwrap_or(now));

        Resolved {
            value: EntryUpdate {
                entry_type: self.entry_type(),
                description: self.description(),
                amount: self.amount(),
                category,
                date,
            },
            new_category,
        }
    }
}

/// Add an entry to a book from a submitted form
pub fn add_entry_from_form(
    db: &Database,
    book: &Book,
    form: &EntryForm,
    offset: FixedOffset,
) -> Result<i64> {
    let resolved = form.to_new_entry(offset, Utc::now());
    if let Some(category) = &resolved.new_category {
        db.add_book_category(book.id, category)?;
    }
    db.add_entry(&book.username, &book.book_name, &resolved.value)
}

/// Edit an entry from a submitted form; false when the entry does not exist
pub fn update_entry_from_form(
    db: &Database,
    book: &Book,
    id: i64,
    form: &EntryForm,
    offset: FixedOffset,
) -> Result<bool> {
    let resolved = form.to_update(offset, Utc::now());
    if let Some(category) = &resolved.new_category {
        db.add_book_category(book.id, category)?;
    }
    db.update_entry(&book.username, &book.book_name, id, &resolved.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{display_offset, format_timestamp};
    use chrono::TimeZone;

    fn ist() -> FixedOffset {
        display_offset(330)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap()
    }

    fn form(category: Option<&str>, custom: Option<&str>) -> EntryForm {
        EntryForm {
            category: category.map(String::from),
            custom_category: custom.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_form_defaults() {
        let resolved = EntryForm::default().to_new_entry(ist(), now());

        assert_eq!(resolved.value.entry_type, EntryType::Expense);
        assert_eq!(resolved.value.amount, 0.0);
        assert_eq!(resolved.value.description, "");
        assert_eq!(resolved.value.category, DEFAULT_CATEGORY);
        assert_eq!(resolved.value.date, now());
        assert!(resolved.new_category.is_none());
    }

    #[test]
    fn test_amount_text_and_garbage() {
        let mut f = EntryForm {
            amount: Some(RawAmount::from("250.75")),
            ..Default::default()
        };
        assert_eq!(f.amount(), 250.75);

        f.amount = Some(RawAmount::from("lots"));
        assert_eq!(f.amount(), 0.0);
    }

    #[test]
    fn test_custom_category_on_add() {
        let resolved = form(Some("__custom__"), Some("  🐶 Pets ")).to_new_entry(ist(), now());
        assert_eq!(resolved.value.category, "🐶 Pets");
        assert_eq!(resolved.new_category.as_deref(), Some("🐶 Pets"));

        let resolved = form(None, Some("Gifts")).to_new_entry(ist(), now());
        assert_eq!(resolved.value.category, "Gifts");

        let resolved = form(Some("__custom__"), Some("   ")).to_new_entry(ist(), now());
        assert_eq!(resolved.value.category, DEFAULT_CATEGORY);
        assert!(resolved.new_category.is_none());
    }

    #[test]
    fn test_picked_category_wins_over_custom_text() {
        let resolved = form(Some("🍱 Food"), Some("ignored")).to_new_entry(ist(), now());
        assert_eq!(resolved.value.category, "🍱 Food");
        assert!(resolved.new_category.is_none());
    }

    #[test]
    fn test_dates_on_add() {
        let mut f = EntryForm {
            date: Some("2024-02-10".to_string()),
            ..Default::default()
        };
        let date = f.to_new_entry(ist(), now()).value.date;
        assert_eq!(format_timestamp(date, ist()), "2024-02-10 00:00:00");

        f.date = Some("not a date".to_string());
        assert_eq!(f.to_new_entry(ist(), now()).value.date, now());
    }

    #[test]
    fn test_edit_keeps_date_when_blank() {
        let mut f = EntryForm {
            date: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(f.to_update(ist(), now()).value.date.is_none());

        f.date = Some("garbage".to_string());
        assert_eq!(f.to_update(ist(), now()).value.date, Some(now()));
    }

    #[test]
    fn test_edit_remembers_non_default_category() {
        let resolved = form(Some("Side hustle"), None).to_update(ist(), now());
        assert_eq!(resolved.value.category, "Side hustle");
        assert_eq!(resolved.new_category.as_deref(), Some("Side hustle"));

        let resolved = form(Some("🏠 Rent"), None).to_update(ist(), now());
        assert!(resolved.new_category.is_none());

        let resolved = form(Some(""), None).to_update(ist(), now());
        assert_eq!(resolved.value.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_form_deserializes_json_and_numbers() {
        let f: EntryForm = serde_json::from_str(
            r#"{"type": "Income", "amount": 1200, "description": " Salary ", "category": "💰 Salary"}"#,
        )
        .unwrap();

        let resolved = f.to_new_entry(ist(), now());
        assert_eq!(resolved.value.entry_type, EntryType::Income);
        assert_eq!(resolved.value.amount, 1200.0);
        assert_eq!(resolved.value.description, "Salary");
    }

    #[test]
    fn test_add_from_form_persists_custom_category() {
        let db = Database::in_memory().unwrap();
        let book = db.create_book("asha", "Home").unwrap();

        let id = add_entry_from_form(
            &db,
            &book,
            &form(Some("__custom__"), Some("🐶 Pets")),
            ist(),
        )
        .unwrap();

        let categories = db.book_categories(book.id).unwrap();
        assert_eq!(categories.last().map(String::as_str), Some("🐶 Pets"));
        let entry = db.get_entry("asha", "Home", id).unwrap().unwrap();
        assert_eq!(entry.raw.category.as_deref(), Some("🐶 Pets"));
    }

    #[test]
    fn test_update_from_form_missing_entry() {
        let db = Database::in_memory().unwrap();
        let book = db.create_book("asha", "Home").unwrap();

        let updated = update_entry_from_form(&db, &book, 999, &EntryForm::default(), ist()).unwrap();
        assert!(!updated);
    }
}
