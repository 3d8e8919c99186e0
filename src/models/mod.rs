mod booking;
mod catalog;

pub use booking::{Booking, BookingRequest, BookingStatus, NewBooking};
pub use catalog::{AddOn, Package};
