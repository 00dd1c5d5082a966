pub mod booking;
pub mod confirmation;
pub mod wizard;

pub use booking::{BookingService, OrderError, PlaceBooking};
