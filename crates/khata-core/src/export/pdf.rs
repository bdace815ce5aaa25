//! PDF transaction report
//!
//! A4 pages with a centered title and a bordered Type / Description / Amount /
//! Category table, continued on new pages as needed. Text is set in the built-in
//! Helvetica fonts, which only cover plain ASCII here, so emoji and other
//! characters outside that range are dropped.

use chrono::Utc;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
};

use super::{export_filename, ExportFormat};
use crate::error::Result;
use crate::models::{RawTransaction, Transaction};
use crate::normalize::normalize_all;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP_MARGIN: f32 = 15.0;
const BOTTOM_MARGIN: f32 = 15.0;
const TITLE_HEIGHT: f32 = 15.0;
const ROW_HEIGHT: f32 = 8.0;

const TITLE_SIZE: f32 = 16.0;
const HEADER_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;

/// Column titles and widths in millimetres
pub const PDF_COLUMNS: [(&str, f32); 4] = [
    ("Type", 35.0),
    ("Description", 65.0),
    ("Amount", 30.0),
    ("Category", 45.0),
];

const DESCRIPTION_CHARS: usize = 30;
const CATEGORY_CHARS: usize = 22;

/// Keep printable ASCII only, then trim what is left
pub fn pdf_safe_text(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Cell text for one normalized entry
pub fn pdf_cells(t: &Transaction) -> [String; 4] {
    let description: String = t.description.chars().take(DESCRIPTION_CHARS).collect();
    let category = pdf_safe_text(&t.category);
    [
        pdf_safe_text(t.entry_type.as_str()),
        pdf_safe_text(&description),
        format!("{:.2}", t.amount),
        category.chars().take(CATEGORY_CHARS).collect(),
    ]
}

/// Body rows that fit under the title on the first page and on later pages
fn rows_per_page(first: bool) -> usize {
    let title = if first { TITLE_HEIGHT } else { 0.0 };
    let usable = PAGE_HEIGHT - TOP_MARGIN - BOTTOM_MARGIN - title - ROW_HEIGHT;
    (usable / ROW_HEIGHT).floor() as usize
}

/// Split rows into pages; an empty report still has one page
pub fn paginate<T: Clone>(rows: &[T]) -> Vec<Vec<T>> {
    let mut pages = Vec::new();
    let mut rest = rows;
    let mut first = true;

    loop {
        let take = rows_per_page(first).min(rest.len());
        let (page, tail) = rest.split_at(take);
        pages.push(page.to_vec());
        rest = tail;
        first = false;
        if rest.is_empty() {
            return pages;
        }
    }
}

fn table_width() -> f32 {
    PDF_COLUMNS.iter().map(|(_, w)| w).sum()
}

fn left_margin() -> f32 {
    (PAGE_WIDTH - table_width()) / 2.0
}

/// Rough Helvetica text width (average glyph is about half the font size)
fn approx_text_width(text: &str, size: f32) -> f32 {
    const PT_TO_MM: f32 = 0.3528;
    text.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

fn cell_border(layer: &PdfLayerReference, x: f32, top: f32, width: f32) {
    let bottom = top - ROW_HEIGHT;
    let corners = [(x, top), (x + width, top), (x + width, bottom), (x, bottom)];
    layer.add_line(Line {
        points: corners
            .iter()
            .map(|&(px, py)| (Point::new(Mm(px), Mm(py)), false))
            .collect(),
        is_closed: true,
    });
}

fn draw_row<S: AsRef<str>>(
    layer: &PdfLayerReference,
    cells: &[S],
    top: f32,
    font: &IndirectFontRef,
    size: f32,
) {
    let mut x = left_margin();
    for ((_, width), text) in PDF_COLUMNS.iter().zip(cells) {
        cell_border(layer, x, top, *width);
        layer.use_text(text.as_ref(), size, Mm(x + 1.5), Mm(top - ROW_HEIGHT + 2.5), font);
        x += width;
    }
}

/// Render entries as a PDF report
///
/// Returns the document bytes and a suggested filename.
pub fn transactions_to_pdf(
    entries: &[RawTransaction],
    book_name: &str,
) -> Result<(Vec<u8>, String)> {
    let title = format!("Transaction Report: {}", pdf_safe_text(book_name));
    let rows: Vec<[String; 4]> = normalize_all(entries, Utc::now())
        .iter()
        .map(pdf_cells)
        .collect();

    let (doc, first_page, first_layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Report");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let header: Vec<&str> = PDF_COLUMNS.iter().map(|(name, _)| *name).collect();

    for (index, page_rows) in paginate(&rows).iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Report");
            doc.get_page(page).get_layer(layer)
        };

        let mut top = PAGE_HEIGHT - TOP_MARGIN;
        if index == 0 {
            let x = ((PAGE_WIDTH - approx_text_width(&title, TITLE_SIZE)) / 2.0).max(left_margin());
            layer.use_text(title.as_str(), TITLE_SIZE, Mm(x), Mm(top - 8.0), &bold);
            top -= TITLE_HEIGHT;
        }

        draw_row(&layer, header.as_slice(), top, &bold, HEADER_SIZE);
        for cells in page_rows {
            top -= ROW_HEIGHT;
            draw_row(&layer, &cells[..], top, &regular, BODY_SIZE);
        }
    }

    let bytes = doc.save_to_bytes()?;
    tracing::debug!(book = %book_name, rows = rows.len(), bytes = bytes.len(), "Rendered PDF");

    Ok((bytes, export_filename(book_name, ExportFormat::Pdf)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawAmount;

    #[test]
    fn test_safe_text_drops_emoji_and_trims() {
        assert_eq!(pdf_safe_text("🍔 Food"), "Food");
        assert_eq!(pdf_safe_text("Chai ☕ stall"), "Chai  stall");
        assert_eq!(pdf_safe_text("📦"), "");
    }

    #[test]
    fn test_cells_match_report_columns() {
        let raw = RawTransaction::expense(1234.5, "🚗 Transport")
            .with_description("Airport cab after a very long delayed flight home");
        let t = Transaction::normalize(&raw, Utc::now());

        let cells = pdf_cells(&t);
        assert_eq!(cells[0], "Expense");
        assert_eq!(cells[1], "Airport cab after a very long");
        assert_eq!(cells[2], "1234.50");
        assert_eq!(cells[3], "Transport");
    }

    #[test]
    fn test_malformed_amount_prints_zero() {
        let raw = RawTransaction::new("Expense", RawAmount::from("abc"));
        let t = Transaction::normalize(&raw, Utc::now());
        assert_eq!(pdf_cells(&t)[2], "0.00");
    }

    #[test]
    fn test_paginate_fills_first_page_then_continues() {
        assert_eq!(paginate::<u32>(&[]), vec![Vec::<u32>::new()]);

        let first = rows_per_page(true);
        let later = rows_per_page(false);
        assert!(later > first);

        let rows: Vec<usize> = (0..first + later + 1).collect();
        let pages = paginate(&rows);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].len(), first);
        assert_eq!(pages[1].len(), later);
        assert_eq!(pages[2], vec![first + later]);
    }

    #[test]
    fn test_table_fits_on_page() {
        assert!(left_margin() > 0.0);
        assert!(left_margin() + table_width() < PAGE_WIDTH);
    }

    #[test]
    fn test_render_produces_pdf_document() {
        let entries: Vec<RawTransaction> = (0..80)
            .map(|i| RawTransaction::expense(i as f64, "🍔 Food").with_description("Lunch"))
            .collect();

        let (bytes, filename) = transactions_to_pdf(&entries, "Home").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(filename, "Home_transactions.pdf");

        let (empty, _) = transactions_to_pdf(&[], "Empty").unwrap();
        assert!(empty.starts_with(b"%PDF"));
    }
}
