use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Raw form input for a booking submission. Held only while the request is
/// being validated; never persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub farmer_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub area_size: f64,
    pub crop_type: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// A persisted booking. Immutable from the farmer client once created; only
/// the admin surface advances `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub farmer_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub area_size: f64,
    pub crop_type: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub special_instructions: Option<String>,
    // Stored verbatim; rows written by other tooling may carry values outside
    // the recognized set, which display as the `unknown` category.
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// Display bucket for the history view. Unrecognized status text falls
/// through to `Unknown` instead of being coerced to a real lifecycle stage.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Unknown,
}

impl StatusCategory {
    pub fn of(status: &str) -> Self {
        match BookingStatus::parse(status) {
            Some(BookingStatus::Pending) => StatusCategory::Pending,
            Some(BookingStatus::Confirmed) => StatusCategory::Confirmed,
            Some(BookingStatus::Completed) => StatusCategory::Completed,
            Some(BookingStatus::Cancelled) => StatusCategory::Cancelled,
            None => StatusCategory::Unknown,
        }
    }
}
