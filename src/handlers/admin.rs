use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::bookings::BookingView;
use crate::models::BookingStatus;
use crate::services::validation::FieldErrors;
use crate::state::AppState;

// The admin surface is the out-of-band process that advances booking
// lifecycles; farmers never reach it.
fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let status_filter = query.status.as_deref();

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::list_all_bookings(&db, status_filter, limit)?
    };

    Ok(Json(
        bookings.iter().map(BookingView::from_booking).collect(),
    ))
}

// POST /api/admin/bookings/:id/status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let status = BookingStatus::parse(&body.status).ok_or_else(|| {
        let mut errors = FieldErrors::default();
        errors.add(
            "status",
            "must be one of pending, confirmed, completed, cancelled",
        );
        AppError::Validation(errors)
    })?;

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_booking_status(&db, &id, &status)?
    };

    if updated {
        tracing::info!(booking_id = %id, status = status.as_str(), "updated booking status");
        Ok(Json(serde_json::json!({ "ok": true })))
    } else {
        Err(AppError::NotFound("booking".to_string()))
    }
}
