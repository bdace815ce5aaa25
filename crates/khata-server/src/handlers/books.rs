//! Book handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, CurrentUser};
use khata_core::insights::InsightEngine;
use khata_core::models::{Book, StoredTransaction, Transaction};
use khata_core::normalize::format_timestamp;

/// Request body for creating a book
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub book_name: String,
}

/// An entry as displayed: normalized values plus a formatted date
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub id: i64,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    /// Date in the display timezone, `YYYY-MM-DD HH:MM:SS`
    pub date_str: String,
}

/// Everything needed to render one book
#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book_name: String,
    pub categories: Vec<String>,
    pub entries: Vec<EntryView>,
    pub income: f64,
    pub expense: f64,
    pub total: f64,
    pub insights: Vec<String>,
}

/// Look up a book owned by the current user
pub(crate) fn require_book(
    state: &AppState,
    user: &CurrentUser,
    book_name: &str,
) -> Result<Book, AppError> {
    state
        .db
        .get_book(&user.username, book_name)?
        .ok_or_else(|| AppError::not_found("Book not found"))
}

/// GET /api/books - List the current user's book names
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<String>>, AppError> {
    let books = state.db.list_books(&user.username)?;
    Ok(Json(books.into_iter().map(|b| b.book_name).collect()))
}

/// POST /api/books - Create a book (returns the existing one if the name is taken)
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = state
        .db
        .create_book_with_categories(
            &user.username,
            &body.book_name,
            state.config.app.default_categories.as_slice(),
        )
        .map_err(AppError::from_core)?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /api/books/:book - Book detail with entries, totals, and insights
pub async fn get_book_detail(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(book_name): Path<String>,
) -> Result<Json<BookDetail>, AppError> {
    let book = require_book(&state, &user, &book_name)?;
    let categories = state.db.book_categories(book.id)?;
    let stored = state.db.list_entries(&user.username, &book.book_name)?;

    let raw: Vec<_> = stored.iter().map(|e| e.raw.clone()).collect();
    let engine = InsightEngine::with_config(state.config.app.insight_config());
    let insights = engine.generate(&raw);
    let summary = state.db.book_summary(&user.username, &book.book_name)?;

    let offset = state.config.app.display_offset();
    let now = Utc::now();
    let entries = stored
        .iter()
        .map(|e| entry_view(e, offset, now))
        .collect();

    Ok(Json(BookDetail {
        book_name: book.book_name,
        categories,
        entries,
        income: summary.income,
        expense: summary.expense,
        total: summary.total,
        insights,
    }))
}

fn entry_view(entry: &StoredTransaction, offset: FixedOffset, now: DateTime<Utc>) -> EntryView {
    let t = Transaction::normalize(&entry.raw, now);
    EntryView {
        id: entry.id,
        entry_type: t.entry_type.to_string(),
        description: t.description,
        amount: t.amount,
        category: t.category,
        date_str: format_timestamp(t.date, offset),
        date: t.date,
    }
}
