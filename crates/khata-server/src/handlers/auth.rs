//! Authentication-related handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::session::{clear_session_cookie, session_cookie, session_token};
use crate::{AppError, AppState, CurrentUser};

/// Signup and login body
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub username: String,
    /// Send as `Authorization: Bearer <token>`, or rely on the cookie
    pub token: String,
}

/// Response for the /api/me endpoint
#[derive(Serialize)]
pub struct MeResponse {
    pub user: String,
    /// How the user was authenticated
    pub auth_method: String,
}

/// GET /api/health - Liveness check
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /api/signup - Create an account
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .db
        .create_user(&body.username, &body.password)
        .map_err(AppError::from_core)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "username": user.username,
        })),
    ))
}

/// POST /api/login - Verify credentials and start a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.verify_user(&body.username, &body.password)? {
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    let user = state
        .db
        .get_user(&body.username)?
        .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;
    let token = state.sessions.create(&user.username);
    info!(user = %user.username, "User logged in");

    Ok((
        [(header::SET_COOKIE, session_cookie(&token, state.sessions.ttl()))],
        Json(LoginResponse {
            status: "success",
            username: user.username,
            token,
        }),
    ))
}

/// POST /api/logout - End the current session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.sessions.remove(&token);
    }

    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(serde_json::json!({ "status": "success" })),
    )
}

/// GET /api/me - Get the current user
pub async fn get_me(Extension(user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user: user.username,
        auth_method: user.auth_method.to_string(),
    })
}
