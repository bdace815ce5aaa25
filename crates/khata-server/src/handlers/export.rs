//! Export handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    Extension,
};
use khata_core::export::ExportFormat;
use tracing::info;

use crate::{AppError, AppState, CurrentUser};

/// Header values must be visible ASCII; anything else becomes `_`
fn header_safe_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

/// GET /api/books/:book/export/csv - Download a book as CSV
pub async fn export_book_csv(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(book_name): Path<String>,
) -> Result<Response<Body>, AppError> {
    let (csv, filename) = state.db.export_book_csv(
        &user.username,
        &book_name,
        state.config.app.display_offset(),
    )?;
    let rows = csv.lines().count().saturating_sub(1);
    info!(book = %book_name, rows, "Exported book to CSV");

    attachment(ExportFormat::Csv, &filename, Body::from(csv))
}

/// GET /api/books/:book/export/pdf - Download a book as a PDF report
pub async fn export_book_pdf(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(book_name): Path<String>,
) -> Result<Response<Body>, AppError> {
    let (pdf, filename) = state.db.export_book_pdf(&user.username, &book_name)?;
    info!(book = %book_name, bytes = pdf.len(), "Exported book to PDF");

    attachment(ExportFormat::Pdf, &filename, Body::from(pdf))
}

fn attachment(
    format: ExportFormat,
    filename: &str,
    body: Body,
) -> Result<Response<Body>, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", header_safe_filename(filename)),
        )
        .body(body)
        .map_err(|e| AppError::internal(&e.to_string()))
}
