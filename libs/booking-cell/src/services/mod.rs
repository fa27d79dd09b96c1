pub mod notification;
pub mod sequencer;
pub mod store;

pub use notification::NotificationService;
pub use sequencer::BookingSequencer;
pub use store::{BookingStore, HttpBookingStore};
