/// Per-acre spraying rate in INR.
pub const PER_ACRE_RATE: f64 = 200.0;
/// Floor applied to any visit, covering transport and setup.
pub const MINIMUM_CHARGE: f64 = 500.0;

/// Estimated cost for spraying `area_acres`. Callers validate the area
/// first; a non-positive area is a form error, not something to clamp here.
pub fn estimate_cost(area_acres: f64) -> f64 {
    (area_acres * PER_ACRE_RATE).max(MINIMUM_CHARGE)
}
