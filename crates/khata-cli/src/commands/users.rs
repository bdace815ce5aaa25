//! User account commands

use anyhow::{Context, Result};
use khata_core::db::Database;

pub fn cmd_signup(db: &Database, username: &str, password: &str) -> Result<()> {
    let user = db
        .create_user(username, password)
        .context("Failed to create user")?;

    println!("✅ Created user '{}'", user.username);
    Ok(())
}
