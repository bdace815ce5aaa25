//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::{AppError, AppState, CurrentUser};
use khata_core::insights::InsightEngine;

#[derive(Serialize)]
pub struct InsightsResponse {
    pub status: &'static str,
    pub insights: Vec<String>,
}

/// GET /api/books/:book/insights - Generate insights for one book
///
/// A book with no entries (or that does not exist) yields the single
/// no-transactions message.
pub async fn get_book_insights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(book_name): Path<String>,
) -> Result<Json<InsightsResponse>, AppError> {
    let raw = state.db.book_transactions(&user.username, &book_name)?;
    let engine = InsightEngine::with_config(state.config.app.insight_config());
    let insights = engine.generate(&raw);

    tracing::debug!(book = %book_name, count = insights.len(), "Insights generated");

    Ok(Json(InsightsResponse {
        status: "success",
        insights,
    }))
}
