pub mod booking;
pub mod catalog;
pub mod user;

pub use booking::{Booking, BookingRequest, BookingStatus, StatusCategory};
pub use user::User;
