//! Entry handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use super::books::require_book;
use crate::{AppError, AppState, CurrentUser};
use khata_core::entries::{add_entry_from_form, update_entry_from_form, EntryForm};

/// Entry ids arrive as path text; anything that is not an integer is a 400
fn parse_entry_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request("Invalid ID"))
}

/// POST /api/books/:book/entries - Add an entry
pub async fn add_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(book_name): Path<String>,
    Json(form): Json<EntryForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let book = require_book(&state, &user, &book_name)?;
    let id = add_entry_from_form(&state.db, &book, &form, state.config.app.display_offset())?;

    tracing::info!(user = %user.username, book = %book.book_name, id, "Entry added");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "id": id })),
    ))
}

/// PUT /api/books/:book/entries/:id - Edit an entry
///
/// Fields are overwritten; the date is kept when not supplied.
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((book_name, id)): Path<(String, String)>,
    Json(form): Json<EntryForm>,
) -> Result<Json<Value>, AppError> {
    let id = parse_entry_id(&id)?;
    let book = require_book(&state, &user, &book_name)?;
    let updated =
        update_entry_from_form(&state.db, &book, id, &form, state.config.app.display_offset())?;

    if !updated {
        return Err(AppError::not_found("Not found"));
    }
    Ok(Json(json!({ "status": "success" })))
}

/// DELETE /api/books/:book/entries/:id - Delete an entry
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((book_name, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let id = parse_entry_id(&id)?;
    if !state.db.delete_entry(&user.username, &book_name, id)? {
        return Err(AppError::not_found("Not found"));
    }

    tracing::info!(user = %user.username, book = %book_name, id, "Entry deleted");
    Ok(Json(json!({ "status": "success" })))
}
