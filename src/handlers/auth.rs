use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::User;
use crate::services::auth;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> &str {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .strip_prefix("Bearer ")
        .unwrap_or("")
}

/// Auth gate for the farmer-facing surface. Resolves the bearer token to a
/// user value that gets passed down the call chain; anonymous callers are
/// pointed back at the login page.
pub fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let token = bearer_token(headers);
    if token.is_empty() {
        return Err(AppError::AuthRequired);
    }

    let db = state.db.lock().unwrap();
    auth::current_user(&db, token)?.ok_or(AppError::AuthRequired)
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

// POST /api/auth/register
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = {
        let db = state.db.lock().unwrap();
        auth::register(
            &db,
            state.config.session_ttl_hours,
            &body.name,
            &body.email,
            &body.phone,
            &body.password,
        )?
    };

    Ok(Json(SessionResponse {
        token: session.token,
        user: session.user,
    }))
}

// POST /api/auth/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = {
        let db = state.db.lock().unwrap();
        auth::login(
            &db,
            state.config.session_ttl_hours,
            &body.email,
            &body.password,
        )?
    };

    Ok(Json(SessionResponse {
        token: session.token,
        user: session.user,
    }))
}

// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<User>, AppError> {
    let user = require_user(&state, &headers)?;
    Ok(Json(user))
}

// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = bearer_token(&headers);
    if !token.is_empty() {
        let db = state.db.lock().unwrap();
        auth::logout(&db, token)?;
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}
