use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BookingError {
    /// The shared counter moved between read and commit. Transient;
    /// the sequencer retries with a freshly read value.
    #[error("Booking counter was modified concurrently")]
    CounterConflict,

    #[error("Maximum retry attempts ({max_attempts}) exceeded allocating a booking number")]
    MaxRetriesExceeded { max_attempts: u32 },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Booking not found: {0}")]
    NotFound(Uuid),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
