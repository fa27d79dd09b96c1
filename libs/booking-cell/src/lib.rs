pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::BookingError;
pub use models::{Booking, BookingStatus, CreateBookingRequest, Notification};
pub use services::sequencer::BookingSequencer;
pub use services::store::BookingStore;
