//! Export command (CSV or PDF report)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use khata_core::db::Database;
use khata_core::export::ExportFormat;
use khata_core::KhataConfig;

/// Write a book's export and return the path written
pub fn cmd_export(
    db: &Database,
    config: &KhataConfig,
    username: &str,
    book_name: &str,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let (bytes, filename, rows) = match format {
        ExportFormat::Csv => {
            let (csv, filename) = db
                .export_book_csv(username, book_name, config.display_offset())
                .context("Failed to export book")?;
            let rows = csv.lines().count().saturating_sub(1);
            (csv.into_bytes(), filename, rows)
        }
        ExportFormat::Pdf => {
            let rows = db.book_transactions(username, book_name)?.len();
            let (pdf, filename) = db
                .export_book_pdf(username, book_name)
                .context("Failed to render PDF report")?;
            (pdf, filename, rows)
        }
    };

    let path = output.map_or_else(|| PathBuf::from(&filename), Path::to_path_buf);
    std::fs::write(&path, &bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "📤 Exported {} entries as {} to {}",
        rows,
        format.extension().to_uppercase(),
        path.display()
    );

    Ok(path)
}
