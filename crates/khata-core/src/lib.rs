//! Khata Core Library
//!
//! Shared functionality for the Khata personal finance tracker:
//! - Insight Engine: heuristic observations over a book's entries
//! - Normalization of loosely-typed stored records
//! - SQLite ledger store for users, books, and entries
//! - Entry form resolution and CSV/PDF export
//! - TOML configuration

pub mod config;
pub mod db;
pub mod entries;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;
pub mod normalize;

pub use config::KhataConfig;
pub use db::Database;
pub use entries::{add_entry_from_form, update_entry_from_form, EntryForm};
pub use error::{Error, Result};
pub use export::{transactions_to_csv, transactions_to_pdf, ExportFormat};
pub use insights::{generate_insights, Finding, InsightConfig, InsightEngine, InsightKind};
