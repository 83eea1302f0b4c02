use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth::require_user;
use crate::models::{catalog, Booking, BookingRequest, StatusCategory};
use crate::services::{pricing, validation};
use crate::state::AppState;

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
pub struct BookingView {
    pub id: String,
    pub farmer_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub area_size: f64,
    pub crop_type: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub special_instructions: Option<String>,
    pub status: String,
    pub status_category: StatusCategory,
    pub estimated_cost: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl BookingView {
    pub fn from_booking(b: &Booking) -> Self {
        Self {
            id: b.id.clone(),
            farmer_name: b.farmer_name.clone(),
            phone: b.phone.clone(),
            address: b.address.clone(),
            city: b.city.clone(),
            state: b.state.clone(),
            pincode: b.pincode.clone(),
            area_size: b.area_size,
            crop_type: b.crop_type.clone(),
            preferred_date: b.preferred_date.format("%Y-%m-%d").to_string(),
            preferred_time: b.preferred_time.clone(),
            special_instructions: b.special_instructions.clone(),
            status: b.status.clone(),
            status_category: StatusCategory::of(&b.status),
            estimated_cost: pricing::estimate_cost(b.area_size),
            created_at: b.created_at.format(TIMESTAMP_FMT).to_string(),
            updated_at: b.updated_at.format(TIMESTAMP_FMT).to_string(),
        }
    }
}

// One user gets one submission in flight at a time; the slot is released on
// every exit path when the guard drops.
struct SubmitGuard<'a> {
    state: &'a AppState,
    user_id: String,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.state.in_flight.lock().unwrap().remove(&self.user_id);
    }
}

fn acquire_submit_slot<'a>(state: &'a AppState, user_id: &str) -> Result<SubmitGuard<'a>, AppError> {
    let mut in_flight = state.in_flight.lock().unwrap();
    if !in_flight.insert(user_id.to_string()) {
        return Err(AppError::Conflict(
            "a booking submission is already in progress".to_string(),
        ));
    }
    Ok(SubmitGuard {
        state,
        user_id: user_id.to_string(),
    })
}

// POST /api/bookings
#[derive(Serialize)]
pub struct CreateBookingResponse {
    pub booking: BookingView,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let user = require_user(&state, &headers)?;
    let _guard = acquire_submit_slot(&state, &user.id)?;

    validation::validate(&request).map_err(AppError::Validation)?;

    let booking = {
        let db = state.db.lock().unwrap();
        queries::create_booking(&db, &user.id, &request)?
    };

    state.handoff.put(booking.clone());

    // The notification completes in the background; its outcome is logged
    // and discarded.
    let notify_state = Arc::clone(&state);
    let notify_booking = booking.clone();
    tokio::spawn(async move {
        if let Err(e) = notify_state.notifier.booking_created(&notify_booking).await {
            tracing::warn!(
                error = %e,
                booking_id = %notify_booking.id,
                "booking notification failed"
            );
        }
    });

    tracing::info!(booking_id = %booking.id, user_id = %user.id, "created booking");

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            booking: BookingView::from_booking(&booking),
        }),
    ))
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingView>>, AppError> {
    let user = require_user(&state, &headers)?;

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::list_bookings_for_user(&db, &user.id)?
    };

    Ok(Json(
        bookings.iter().map(BookingView::from_booking).collect(),
    ))
}

// GET /api/bookings/confirmation
#[derive(Serialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Serialize)]
pub struct ConfirmationResponse {
    pub booking: BookingView,
    pub customer: CustomerInfo,
}

pub async fn confirmation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let user = require_user(&state, &headers)?;

    let booking = state
        .handoff
        .take(&user.id)
        .ok_or(AppError::NoPendingConfirmation)?;

    Ok(Json(ConfirmationResponse {
        booking: BookingView::from_booking(&booking),
        customer: CustomerInfo {
            name: user.name,
            email: user.email,
            phone: user.phone,
        },
    }))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BookingView>, AppError> {
    let user = require_user(&state, &headers)?;

    let booking = {
        let db = state.db.lock().unwrap();
        queries::get_booking_for_user(&db, &id, &user.id)?
    }
    .ok_or_else(|| AppError::NotFound("booking".to_string()))?;

    Ok(Json(BookingView::from_booking(&booking)))
}

// GET /api/catalog
pub async fn get_catalog() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "states": catalog::STATES,
        "crop_types": catalog::CROP_TYPES,
        "time_slots": catalog::TIME_SLOTS,
        "pricing": {
            "per_acre_rate": pricing::PER_ACRE_RATE,
            "minimum_charge": pricing::MINIMUM_CHARGE,
        },
    }))
}
