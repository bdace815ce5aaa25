//! Khata CLI - Personal finance tracker
//!
//! Usage:
//!   khata init                      Initialize database
//!   khata signup alice secret       Create a user
//!   khata books alice create Home   Create a book
//!   khata insights alice Home       Show spending insights
//!   khata serve --port 3000         Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if let Commands::Init = cli.command {
        return commands::cmd_init(&cli.db);
    }

    let config = commands::load_config(cli.config.as_deref())?;
    let db = commands::open_db(&cli.db)?;

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Signup { username, password } => {
            commands::cmd_signup(&db, &username, &password)
        }
        Commands::Books { username, action } => match action {
            Some(BooksAction::Create { name }) => {
                commands::cmd_books_create(&db, &config, &username, &name)
            }
            None => commands::cmd_books_list(&db, &username),
        },
        Commands::Add {
            username,
            book,
            entry_type,
            amount,
            category,
            custom_category,
            description,
            date,
        } => {
            let args = commands::AddArgs {
                entry_type,
                amount,
                category,
                custom_category,
                description,
                date,
            };
            commands::cmd_add(&db, &config, &username, &book, args)
        }
        Commands::Entries { username, book } => {
            commands::cmd_entries(&db, &config, &username, &book)
        }
        Commands::Insights {
            username,
            book,
            json,
        } => commands::cmd_insights(&db, &config, &username, &book, json),
        Commands::Export {
            username,
            book,
            format,
            output,
        } => {
            let format = format.parse()?;
            commands::cmd_export(&db, &config, &username, &book, format, output.as_deref())
                .map(|_| ())
        }
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(db, config, &cli.db, &host, port, no_auth).await,
    }
}
