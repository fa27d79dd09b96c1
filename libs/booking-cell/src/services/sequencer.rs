use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::BookingError;
use crate::models::{Booking, BookingStatus, CreateBookingRequest};
use crate::services::store::BookingStore;

/// Allocates booking numbers against the shared counter. The counter
/// increment and the booking write happen in one atomic store operation;
/// a lost race re-reads and retries up to `max_attempts`.
pub struct BookingSequencer {
    store: Arc<dyn BookingStore>,
    max_attempts: u32,
}

impl BookingSequencer {
    pub fn new(store: Arc<dyn BookingStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create a booking with the next number in the shared sequence.
    /// Exactly one caller observes each integer value; a conflicting
    /// commit never overwrites, it retries with the freshly read value.
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        for attempt in 1..=self.max_attempts {
            let last_number = self.store.read_counter().await?;
            let booking = Booking {
                id: Uuid::new_v4(),
                booking_number: last_number + 1,
                user_id: request.user_id,
                doctor_id: request.doctor_id,
                scheduled_at: request.scheduled_at,
                created_at: Utc::now(),
                status: BookingStatus::Booked,
                read: false,
            };

            match self.store.commit_booking(last_number, &booking).await {
                Ok(()) => {
                    info!(
                        "Booking {} committed with number {} on attempt {}",
                        booking.id, booking.booking_number, attempt
                    );
                    return Ok(booking);
                }
                Err(BookingError::CounterConflict) => {
                    warn!(
                        "Counter conflict on attempt {}/{}, retrying",
                        attempt, self.max_attempts
                    );
                }
                // Store failures fail fast: no partial state, no reuse.
                Err(e) => return Err(e),
            }
        }

        Err(BookingError::MaxRetriesExceeded {
            max_attempts: self.max_attempts,
        })
    }

    /// Compensating cancellation. A booking is not cancellable
    /// mid-transaction; this is the only after-the-fact mutation.
    pub async fn cancel_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let booking = self.store.get_booking(booking_id).await?;

        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::ValidationError(
                "Booking is already cancelled".to_string(),
            ));
        }

        let cancelled = self
            .store
            .update_booking_status(booking_id, BookingStatus::Cancelled)
            .await?;

        info!("Booking {} cancelled", booking_id);
        Ok(cancelled)
    }

    pub async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, BookingError> {
        self.store.list_bookings(user_id).await
    }
}
