//! Entry operations
//!
//! Entries are scoped by owner and book name. Reads never fail on malformed
//! stored values; they come back as-is in [`RawTransaction`] and are normalized
//! downstream.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::insights::Totals;
use crate::models::{
    BookSummary, EntryUpdate, NewEntry, RawAmount, RawTransaction, StoredTransaction,
};
use crate::normalize::{normalize_all, parse_stored_date};

const ENTRY_COLUMNS: &str =
    "id, username, book_name, entry_type, description, amount, category, date, created_at";

fn value_to_amount(value: Value) -> Option<RawAmount> {
    match value {
        Value::Integer(n) => Some(RawAmount::Number(n as f64)),
        Value::Real(n) => Some(RawAmount::Number(n)),
        Value::Text(s) => Some(RawAmount::Text(s)),
        Value::Null | Value::Blob(_) => None,
    }
}

fn value_to_date(value: Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Text(s) => parse_stored_date(&s),
        Value::Integer(secs) => DateTime::from_timestamp(secs, 0),
        _ => None,
    }
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<StoredTransaction> {
    let created_at_str: String = row.get(8)?;
    Ok(StoredTransaction {
        id: row.get(0)?,
        username: row.get(1)?,
        book_name: row.get(2)?,
        raw: RawTransaction {
            entry_type: row.get(3)?,
            description: row.get(4)?,
            amount: value_to_amount(row.get(5)?),
            category: row.get(6)?,
            date: value_to_date(row.get(7)?),
        },
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Insert an entry and return its ID
    pub fn add_entry(&self, username: &str, book_name: &str, entry: &NewEntry) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (username, book_name, entry_type, description, amount, category, date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                username,
                book_name,
                entry.entry_type.as_str(),
                entry.description,
                entry.amount,
                entry.category,
                entry.date.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!(id, book = %book_name, entry_type = %entry.entry_type, "Entry added");
        Ok(id)
    }

    /// Overwrite an entry's fields; the stored date is kept when `update.date` is `None`
    ///
    /// Returns false when no entry with that ID exists in the book.
    pub fn update_entry(
        &self,
        username: &str,
        book_name: &str,
        id: i64,
        update: &EntryUpdate,
    ) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE transactions
            SET entry_type = ?, description = ?, amount = ?, category = ?, date = COALESCE(?, date)
            WHERE id = ? AND username = ? AND book_name = ?
            "#,
            params![
                update.entry_type.as_str(),
                update.description,
                update.amount,
                update.category,
                update.date.map(|d| d.to_rfc3339()),
                id,
                username,
                book_name,
            ],
        )?;

        Ok(changed > 0)
    }

    /// Delete an entry; returns false when it was not found
    pub fn delete_entry(&self, username: &str, book_name: &str, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND username = ? AND book_name = ?",
            params![id, username, book_name],
        )?;

        if deleted > 0 {
            tracing::debug!(id, book = %book_name, "Entry deleted");
        }
        Ok(deleted > 0)
    }

    pub fn get_entry(
        &self,
        username: &str,
        book_name: &str,
        id: i64,
    ) -> Result<Option<StoredTransaction>> {
        let conn = self.conn()?;
        let entry = conn
            .query_row(
                &format!(
                    "SELECT {} FROM transactions WHERE id = ? AND username = ? AND book_name = ?",
                    ENTRY_COLUMNS
                ),
                params![id, username, book_name],
                row_to_entry,
            )
            .optional()?;

        Ok(entry)
    }

    /// All entries of one book, in insertion order
    pub fn list_entries(&self, username: &str, book_name: &str) -> Result<Vec<StoredTransaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE username = ? AND book_name = ? ORDER BY id",
            ENTRY_COLUMNS
        ))?;

        let entries = stmt
            .query_map(params![username, book_name], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Raw records of one book, ready for the insight engine
    pub fn book_transactions(&self, username: &str, book_name: &str) -> Result<Vec<RawTransaction>> {
        Ok(self
            .list_entries(username, book_name)?
            .into_iter()
            .map(|e| e.raw)
            .collect())
    }

    /// Income, expense, and net total over a book's normalized entries
    pub fn book_summary(&self, username: &str, book_name: &str) -> Result<BookSummary> {
        let raw = self.book_transactions(username, book_name)?;
        let totals = Totals::from_transactions(&normalize_all(&raw, Utc::now()));
        Ok(totals.into())
    }
}
