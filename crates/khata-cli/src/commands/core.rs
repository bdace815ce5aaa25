//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Resolve the app configuration
//! - `require_book` - Look up a user's book or fail with a readable error
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use khata_core::db::Database;
use khata_core::models::Book;
use khata_core::KhataConfig;

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn load_config(explicit: Option<&Path>) -> Result<KhataConfig> {
    KhataConfig::load(explicit).context("Failed to load config")
}

pub fn require_book(db: &Database, username: &str, book_name: &str) -> Result<Book> {
    db.get_book(username, book_name)?
        .with_context(|| format!("Book '{}' not found for user '{}'", book_name, username))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: khata signup <username> <password>");
    println!("  2. Create a book: khata books <username> create <name>");
    println!("  3. Start web UI: khata serve");

    Ok(())
}
