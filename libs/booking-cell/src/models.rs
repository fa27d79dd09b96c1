use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Booked,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Booked => write!(f, "booked"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One confirmed appointment. Immutable after creation except for
/// `status` (compensating cancellation) and `read` (notification flag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    /// User-facing, globally unique, monotonically increasing.
    pub booking_number: i64,
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub read: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
}

/// The single shared counter document. All mutation goes through the
/// sequencer's compare-and-swap commit; nothing else may write it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCounter {
    pub last_number: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub booking_number: i64,
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
