//! Export of a book's entries
//!
//! CSV carries every field including the date; the PDF report (see [`pdf`]) is a
//! printable table without dates.

use std::str::FromStr;

use chrono::{FixedOffset, Utc};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::RawTransaction;
use crate::normalize::{format_timestamp, normalize_all};

pub mod pdf;

pub use pdf::transactions_to_pdf;

/// Column order of exported files
pub const CSV_HEADER: [&str; 5] = ["Type", "Description", "Amount", "Category", "Date"];

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            other => Err(Error::InvalidData(format!("Unknown export format: {}", other))),
        }
    }
}

/// Download filename for a book's export, `<book>_transactions.<ext>`
pub fn export_filename(book_name: &str, format: ExportFormat) -> String {
    format!("{}_transactions.{}", book_name, format.extension())
}

/// Render entries as CSV
///
/// Values are normalized first, so malformed amounts export as `0.00`. Returns the
/// CSV text and a suggested filename.
pub fn transactions_to_csv(
    entries: &[RawTransaction],
    book_name: &str,
    offset: FixedOffset,
) -> Result<(String, String)> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for t in normalize_all(entries, Utc::now()) {
        let amount = format!("{:.2}", t.amount);
        let date = format_timestamp(t.date, offset);
        writer.write_record([
            t.entry_type.as_str(),
            t.description.as_str(),
            amount.as_str(),
            t.category.as_str(),
            date.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    let csv = String::from_utf8(bytes)
        .map_err(|e| Error::InvalidData(format!("CSV output is not UTF-8: {}", e)))?;

    Ok((csv, export_filename(book_name, ExportFormat::Csv)))
}

impl Database {
    /// Export one book as CSV
    pub fn export_book_csv(
        &self,
        username: &str,
        book_name: &str,
        offset: FixedOffset,
    ) -> Result<(String, String)> {
        let entries = self.book_transactions(username, book_name)?;
        tracing::debug!(book = %book_name, rows = entries.len(), "Exporting book CSV");
        transactions_to_csv(&entries, book_name, offset)
    }

    /// Export one book as a PDF report
    pub fn export_book_pdf(&self, username: &str, book_name: &str) -> Result<(Vec<u8>, String)> {
        let entries = self.book_transactions(username, book_name)?;
        tracing::debug!(book = %book_name, rows = entries.len(), "Exporting book PDF");
        transactions_to_pdf(&entries, book_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawAmount;
    use crate::normalize::display_offset;
    use chrono::TimeZone;

    #[test]
    fn test_header_only_for_empty_book() {
        let (csv, filename) = transactions_to_csv(&[], "Home", display_offset(330)).unwrap();
        assert_eq!(csv, "Type,Description,Amount,Category,Date\n");
        assert_eq!(filename, "Home_transactions.csv");
    }

    #[test]
    fn test_export_format_parsing_and_filenames() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(" PDF ".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!(matches!(
            "xlsx".parse::<ExportFormat>().unwrap_err(),
            Error::InvalidData(_)
        ));

        assert_eq!(export_filename("Trip", ExportFormat::Pdf), "Trip_transactions.pdf");
        assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
    }

    #[test]
    fn test_rows_are_normalized_and_quoted() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        let entries = vec![
            RawTransaction::expense(12.5, "🍱 Food")
                .with_description("Tea, biscuits")
                .with_date(date),
            RawTransaction::new("Expense", RawAmount::from("n/a")).with_date(date),
        ];

        let (csv, _) = transactions_to_csv(&entries, "Home", display_offset(330)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[1], "Expense,\"Tea, biscuits\",12.50,🍱 Food,2024-03-02 00:00:00");
        assert_eq!(lines[2], "Expense,,0.00,📦 Other,2024-03-02 00:00:00");
    }

    #[test]
    fn test_export_reads_one_book_only() {
        let db = Database::in_memory().unwrap();
        db.create_book("asha", "Home").unwrap();
        db.create_book("asha", "Trip").unwrap();

        let entry = crate::models::NewEntry {
            entry_type: crate::models::EntryType::Income,
            description: "Salary".to_string(),
            amount: 1000.0,
            category: "💰 Salary".to_string(),
            date: Utc::now(),
        };
        db.add_entry("asha", "Home", &entry).unwrap();

        let (home, _) = db.export_book_csv("asha", "Home", display_offset(0)).unwrap();
        let (trip, _) = db.export_book_csv("asha", "Trip", display_offset(0)).unwrap();

        assert_eq!(home.lines().count(), 2);
        assert!(home.contains("Income,Salary,1000.00,💰 Salary,"));
        assert_eq!(trip.lines().count(), 1);
    }
}
