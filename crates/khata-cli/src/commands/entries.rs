//! Entry commands (add, list)

use anyhow::{Context, Result};
use chrono::Utc;
use khata_core::db::Database;
use khata_core::entries::{add_entry_from_form, EntryForm};
use khata_core::models::{RawAmount, Transaction};
use khata_core::normalize::format_timestamp;
use khata_core::KhataConfig;

use super::{require_book, truncate};

/// Arguments for `khata add`, as typed on the command line
#[derive(Debug, Default)]
pub struct AddArgs {
    pub entry_type: String,
    pub amount: String,
    pub category: Option<String>,
    pub custom_category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl AddArgs {
    fn into_form(self) -> EntryForm {
        EntryForm {
            entry_type: Some(self.entry_type),
            description: self.description,
            amount: Some(RawAmount::Text(self.amount)),
            category: self.category,
            custom_category: self.custom_category,
            date: self.date,
        }
    }
}

pub fn cmd_add(
    db: &Database,
    config: &KhataConfig,
    username: &str,
    book_name: &str,
    args: AddArgs,
) -> Result<()> {
    let book = require_book(db, username, book_name)?;
    let form = args.into_form();

    let id = add_entry_from_form(db, &book, &form, config.display_offset())
        .context("Failed to add entry")?;

    let entry = db
        .get_entry(username, &book.book_name, id)?
        .context("Entry vanished after insert")?;
    let t = Transaction::normalize(&entry.raw, Utc::now());

    println!(
        "✅ Added {} {}{:.2} to '{}' ({}) as #{}",
        t.entry_type, config.currency_symbol, t.amount, book.book_name, t.category, id
    );
    Ok(())
}

pub fn cmd_entries(
    db: &Database,
    config: &KhataConfig,
    username: &str,
    book_name: &str,
) -> Result<()> {
    let book = require_book(db, username, book_name)?;
    let entries = db.list_entries(username, &book.book_name)?;

    if entries.is_empty() {
        println!("No entries in '{}'.", book.book_name);
        return Ok(());
    }

    let offset = config.display_offset();
    let now = Utc::now();

    println!(
        "{:<6} {:<19} {:<8} {:>12}  {:<18} {}",
        "ID", "Date", "Type", "Amount", "Category", "Description"
    );
    println!("{}", "-".repeat(90));

    for entry in &entries {
        let t = Transaction::normalize(&entry.raw, now);
        println!(
            "{:<6} {:<19} {:<8} {:>12.2}  {:<18} {}",
            entry.id,
            format_timestamp(t.date, offset),
            truncate(t.entry_type.as_str(), 8),
            t.amount,
            truncate(&t.category, 18),
            truncate(&t.description, 30)
        );
    }

    let summary = db.book_summary(username, &book.book_name)?;
    println!();
    println!(
        "Income {sym}{:.2} | Expense {sym}{:.2} | Balance {sym}{:.2}",
        summary.income,
        summary.expense,
        summary.total,
        sym = config.currency_symbol
    );

    Ok(())
}
