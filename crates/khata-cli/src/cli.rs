//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Khata - A ledger of books with spending insights
#[derive(Parser)]
#[command(name = "khata")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "khata.db", global = true)]
    pub db: PathBuf,

    /// Config file (defaults to $KHATA_CONFIG, then the user data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Create a user account
    Signup {
        username: String,
        password: String,
    },

    /// List a user's books
    Books {
        username: String,

        #[command(subcommand)]
        action: Option<BooksAction>,
    },

    /// Add an entry to a book
    Add {
        username: String,
        book: String,

        /// Entry type: Income or Expense
        #[arg(short = 't', long = "type", default_value = "Expense")]
        entry_type: String,

        /// Amount (text that is not a number is stored as 0)
        #[arg(short, long)]
        amount: String,

        /// Category, or __custom__ together with --custom-category
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text category, remembered on the book
        #[arg(long)]
        custom_category: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD or ISO-8601); defaults to now
        #[arg(long)]
        date: Option<String>,
    },

    /// List the entries in a book
    Entries { username: String, book: String },

    /// Show insights for a book
    Insights {
        username: String,
        book: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a book to CSV or a PDF report
    Export {
        username: String,
        book: String,

        /// Output format
        #[arg(short, long, default_value = "csv", value_parser = ["csv", "pdf"])]
        format: String,

        /// Output file (defaults to <book>_transactions.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
pub enum BooksAction {
    /// Create a book seeded with the default categories
    Create { name: String },
}
