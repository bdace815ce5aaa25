//! User operations
//!
//! Passwords are compared as stored; credential hardening is out of scope here.

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

/// Canonical form of a username: trimmed and lowercased
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

impl Database {
    /// Create a new user; surrounding whitespace is dropped from the password
    ///
    /// Returns `Conflict` when the username is taken.
    pub fn create_user(&self, username: &str, password: &str) -> Result<User> {
        let username = normalize_username(username);
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::InvalidData(
                "Username and password are required".to_string(),
            ));
        }

        if self.get_user(&username)?.is_some() {
            return Err(Error::Conflict(format!("User {} already exists", username)));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (username, password) VALUES (?, ?)",
            params![username, password],
        )?;
        drop(conn);

        tracing::info!(username = %username, "User created");

        self.get_user(&username)?
            .ok_or_else(|| Error::NotFound(format!("User {}", username)))
    }

    /// Check a username/password pair; the password is trimmed like at signup
    pub fn verify_user(&self, username: &str, password: &str) -> Result<bool> {
        let conn = self.conn()?;
        let stored: Option<String> = conn
            .query_row(
                "SELECT password FROM users WHERE username = ?",
                params![normalize_username(username)],
                |row| row.get(0),
            )
            .optional()?;

        Ok(stored.is_some_and(|p| p == password.trim()))
    }

    /// Get a user by name
    pub fn get_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT username, created_at FROM users WHERE username = ?",
                params![normalize_username(username)],
                |row| {
                    let created_at_str: String = row.get(1)?;
                    Ok(User {
                        username: row.get(0)?,
                        created_at: parse_datetime(&created_at_str),
                    })
                },
            )
            .optional()?;

        Ok(user)
    }
}
