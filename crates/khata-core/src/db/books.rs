//! Book and category operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Book, DEFAULT_CATEGORIES};

fn row_to_book(row: &Row<'_>) -> rusqlite::Result<Book> {
    let created_at_str: String = row.get(3)?;
    Ok(Book {
        id: row.get(0)?,
        username: row.get(1)?,
        book_name: row.get(2)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create a book seeded with the built-in categories
    pub fn create_book(&self, username: &str, book_name: &str) -> Result<Book> {
        self.create_book_with_categories(username, book_name, &DEFAULT_CATEGORIES)
    }

    /// Create a book, or return the existing one with that name
    ///
    /// `categories` seeds the category list of a new book; an existing book is
    /// left untouched.
    pub fn create_book_with_categories<S: AsRef<str>>(
        &self,
        username: &str,
        book_name: &str,
        categories: &[S],
    ) -> Result<Book> {
        let book_name = book_name.trim();
        if book_name.is_empty() {
            return Err(Error::InvalidData("Book name is required".to_string()));
        }

        if let Some(existing) = self.get_book(username, book_name)? {
            return Ok(existing);
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO books (username, book_name) VALUES (?, ?)",
            params![username, book_name],
        )?;
        let book_id = tx.last_insert_rowid();

        for (position, name) in categories.iter().enumerate() {
            tx.execute(
                "INSERT OR IGNORE INTO book_categories (book_id, name, position) VALUES (?, ?, ?)",
                params![book_id, name.as_ref(), position as i64],
            )?;
        }
        tx.commit()?;
        drop(conn);

        tracing::info!(username = %username, book = %book_name, "Book created");

        self.get_book(username, book_name)?
            .ok_or_else(|| Error::NotFound(format!("Book {}", book_name)))
    }

    /// Get one of a user's books by name
    pub fn get_book(&self, username: &str, book_name: &str) -> Result<Option<Book>> {
        let conn = self.conn()?;
        let book = conn
            .query_row(
                "SELECT id, username, book_name, created_at FROM books WHERE username = ? AND book_name = ?",
                params![username, book_name],
                row_to_book,
            )
            .optional()?;

        Ok(book)
    }

    /// List a user's books in creation order
    pub fn list_books(&self, username: &str) -> Result<Vec<Book>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, book_name, created_at FROM books WHERE username = ? ORDER BY id",
        )?;

        let books = stmt
            .query_map(params![username], row_to_book)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(books)
    }

    /// Category list for a book: seeded defaults first, then additions in order
    pub fn book_categories(&self, book_id: i64) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT name FROM book_categories WHERE book_id = ? ORDER BY position")?;

        let names = stmt
            .query_map(params![book_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(names)
    }

    /// Add a category to a book if it is not already listed
    ///
    /// Returns whether the category was new.
    pub fn add_book_category(&self, book_id: i64, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let conn = self.conn()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO book_categories (book_id, name, position)
            VALUES (?1, ?2, (SELECT COALESCE(MAX(position), -1) + 1 FROM book_categories WHERE book_id = ?1))
            "#,
            params![book_id, name],
        )?;

        if inserted > 0 {
            tracing::debug!(book_id, category = %name, "Category added to book");
        }

        Ok(inserted > 0)
    }
}
