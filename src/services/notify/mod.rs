pub mod twilio;

use async_trait::async_trait;

use crate::models::Booking;
use crate::services::pricing;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn booking_created(&self, booking: &Booking) -> anyhow::Result<()>;
}

pub fn booking_created_message(booking: &Booking) -> String {
    let cost = pricing::estimate_cost(booking.area_size);
    format!(
        "AgriDrone Seva: booking {} received for {} acres of {} on {} ({}). \
         Estimated cost Rs {cost}. Our team will contact you to confirm.",
        &booking.id[..8.min(booking.id.len())],
        booking.area_size,
        booking.crop_type,
        booking.preferred_date.format("%d-%m-%Y"),
        booking.preferred_time,
    )
}

/// Fallback used when no SMS credentials are configured; keeps the
/// notification path observable in development.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn booking_created(&self, booking: &Booking) -> anyhow::Result<()> {
        tracing::info!(
            booking_id = %booking.id,
            phone = %booking.phone,
            "booking notification: {}",
            booking_created_message(booking)
        );
        Ok(())
    }
}
