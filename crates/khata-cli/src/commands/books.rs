//! Book commands

use anyhow::{Context, Result};
use khata_core::db::Database;
use khata_core::KhataConfig;

pub fn cmd_books_list(db: &Database, username: &str) -> Result<()> {
    let books = db.list_books(username)?;

    if books.is_empty() {
        println!("No books yet. Create one with: khata books {} create <name>", username);
        return Ok(());
    }

    println!("📚 Books for {}", username);
    println!();
    for book in &books {
        let summary = db.book_summary(username, &book.book_name)?;
        println!(
            "  {:<24} income {:>12.2}  expense {:>12.2}  balance {:>12.2}",
            book.book_name, summary.income, summary.expense, summary.total
        );
    }
    println!();
    println!("Total: {} books", books.len());

    Ok(())
}

pub fn cmd_books_create(
    db: &Database,
    config: &KhataConfig,
    username: &str,
    name: &str,
) -> Result<()> {
    let book = db
        .create_book_with_categories(username, name, config.default_categories.as_slice())
        .context("Failed to create book")?;
    let categories = db.book_categories(book.id)?;

    println!("✅ Book '{}' ready ({} categories)", book.book_name, categories.len());
    Ok(())
}
