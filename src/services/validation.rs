use std::collections::BTreeMap;

use chrono::Local;
use serde::Serialize;

use crate::models::{catalog, BookingRequest};

/// Field-level validation failures, keyed by form field name. All failing
/// fields are reported in one pass so the user can fix the form once.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|s| s.as_str())
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.chars().all(|c| c.is_ascii_digit())
}

/// Pure form validation; the caller decides what to do with a valid request.
/// "Today" is the server's local date.
pub fn validate(request: &BookingRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if request.farmer_name.trim().is_empty() {
        errors.add("farmer_name", "farmer name is required");
    }
    if !is_digits(&request.phone, 10) {
        errors.add("phone", "phone number must be exactly 10 digits");
    }
    if request.address.trim().is_empty() {
        errors.add("address", "address is required");
    }
    if request.city.trim().is_empty() {
        errors.add("city", "city is required");
    }
    if !catalog::is_valid_state(&request.state) {
        errors.add("state", "select a state from the list");
    }
    if !is_digits(&request.pincode, 6) {
        errors.add("pincode", "pincode must be exactly 6 digits");
    }
    if !request.area_size.is_finite() || request.area_size < 0.1 {
        errors.add("area_size", "land area must be at least 0.1 acres");
    }
    if !catalog::is_valid_crop_type(&request.crop_type) {
        errors.add("crop_type", "select a crop type from the list");
    }
    if request.preferred_date < Local::now().date_naive() {
        errors.add("preferred_date", "preferred date cannot be in the past");
    }
    if !catalog::is_valid_time_slot(&request.preferred_time) {
        errors.add("preferred_time", "select a time slot from the list");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
