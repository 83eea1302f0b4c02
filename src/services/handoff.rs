use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::Booking;

/// One-shot bridge between booking submission and the confirmation view,
/// one slot per user. `put` overwrites any earlier snapshot; `take` clears
/// the slot so a revisited confirmation cannot redisplay a stale booking.
/// Never a source of truth for history — that is the store's job.
#[derive(Default)]
pub struct HandoffStore {
    slots: Mutex<HashMap<String, Booking>>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, booking: Booking) {
        self.slots
            .lock()
            .unwrap()
            .insert(booking.user_id.clone(), booking);
    }

    pub fn take(&self, user_id: &str) -> Option<Booking> {
        self.slots.lock().unwrap().remove(user_id)
    }
}
