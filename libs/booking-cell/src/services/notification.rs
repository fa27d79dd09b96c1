use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::BookingError;
use crate::models::{Booking, Notification};
use crate::services::store::BookingStore;

/// Derives user-facing notifications from sequenced bookings. Exactly one
/// notification exists per booking: re-delivery returns the stored record
/// instead of creating a duplicate.
pub struct NotificationService {
    store: Arc<dyn BookingStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn notify_booked(&self, booking: &Booking) -> Result<Notification, BookingError> {
        if let Some(existing) = self.store.notification_for_booking(booking.id).await? {
            debug!(
                "Notification for booking {} already exists, skipping",
                booking.id
            );
            return Ok(existing);
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            booking_number: booking.booking_number,
            user_id: booking.user_id,
            doctor_id: booking.doctor_id,
            message: format!(
                "Appointment booked for {}. Booking number: {}.",
                booking.scheduled_at.to_rfc3339(),
                booking.booking_number
            ),
            read: false,
            created_at: Utc::now(),
        };

        self.store.insert_notification(&notification).await?;
        info!(
            "Notification {} created for booking {}",
            notification.id, booking.id
        );
        Ok(notification)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, BookingError> {
        self.store.list_notifications(user_id).await
    }

    pub async fn mark_read(&self, notification_id: Uuid) -> Result<Notification, BookingError> {
        self.store.mark_notification_read(notification_id).await
    }
}
