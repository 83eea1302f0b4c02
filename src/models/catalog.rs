/// Fixed option lists served to the booking form and enforced by validation.
/// These mirror what the service actually operates: four southern states,
/// the crops the spraying fleet is certified for, and the flyable day slots.
pub const STATES: &[&str] = &["Andhra Pradesh", "Telangana", "Karnataka", "Tamil Nadu"];

pub const CROP_TYPES: &[&str] = &[
    "Rice",
    "Cotton",
    "Sugarcane",
    "Maize",
    "Wheat",
    "Soybean",
    "Groundnut",
    "Chilli",
    "Turmeric",
    "Tobacco",
    "Banana",
    "Mango",
    "Other",
];

pub const TIME_SLOTS: &[&str] = &[
    "Early Morning (6:00 AM - 8:00 AM)",
    "Morning (8:00 AM - 10:00 AM)",
    "Late Morning (10:00 AM - 12:00 PM)",
    "Evening (4:00 PM - 6:00 PM)",
    "Late Evening (6:00 PM - 8:00 PM)",
];

pub fn is_valid_state(s: &str) -> bool {
    STATES.contains(&s)
}

pub fn is_valid_crop_type(s: &str) -> bool {
    CROP_TYPES.contains(&s)
}

pub fn is_valid_time_slot(s: &str) -> bool {
    TIME_SLOTS.contains(&s)
}
