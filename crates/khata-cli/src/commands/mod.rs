//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, load_config)
//! - `users` - Account creation
//! - `books` - Book listing and creation
//! - `entries` - Adding and listing entries
//! - `insights` - Insight generation
//! - `export` - CSV export
//! - `serve` - Web server command

pub mod books;
pub mod core;
pub mod entries;
pub mod export;
pub mod insights;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use books::*;
pub use self::core::*;
pub use entries::*;
pub use export::*;
pub use insights::*;
pub use serve::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
