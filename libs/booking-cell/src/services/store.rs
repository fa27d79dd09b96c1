use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};

use crate::error::BookingError;
use crate::models::{Booking, BookingCounter, BookingStatus, Notification};

/// Seam between the sequencer and the document store. The store
/// collaborator provides per-document transactions; `commit_booking` is
/// the one all-or-nothing operation the counter invariant depends on.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Current counter value; an absent counter reads as 0 so the first
    /// booking gets number 1.
    async fn read_counter(&self) -> Result<i64, BookingError>;

    /// Atomically advance the counter to `booking.booking_number` and
    /// persist the booking, iff the counter still equals `expected`.
    /// A moved counter yields `CounterConflict` and writes nothing.
    async fn commit_booking(&self, expected: i64, booking: &Booking) -> Result<(), BookingError>;

    async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError>;

    async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, BookingError>;

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, BookingError>;

    async fn insert_notification(&self, notification: &Notification) -> Result<(), BookingError>;

    async fn notification_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Notification>, BookingError>;

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, BookingError>;

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> Result<Notification, BookingError>;
}

/// Production implementation over the document store's REST surface.
pub struct HttpBookingStore {
    store: StoreClient,
}

impl HttpBookingStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    fn representation_headers() -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );
        headers
    }
}

fn map_store_error(e: StoreError) -> BookingError {
    match e {
        StoreError::Unavailable(msg) => BookingError::StoreUnavailable(msg),
        StoreError::NotFound(msg) | StoreError::Rejected(msg) => BookingError::DatabaseError(msg),
    }
}

#[async_trait]
impl BookingStore for HttpBookingStore {
    async fn read_counter(&self) -> Result<i64, BookingError> {
        let result: Vec<BookingCounter> = self
            .store
            .request(
                Method::GET,
                "/rest/v1/booking_counter?id=eq.global&select=last_number",
                None,
            )
            .await
            .map_err(map_store_error)?;

        Ok(result.first().map(|c| c.last_number).unwrap_or(0))
    }

    async fn commit_booking(&self, expected: i64, booking: &Booking) -> Result<(), BookingError> {
        debug!(
            "Committing booking {} with number {} (expected counter {})",
            booking.id, booking.booking_number, expected
        );

        // Transactional store function: advances the counter and inserts
        // the booking in one unit, or reports the counter moved.
        let body = json!({
            "expected_number": expected,
            "booking": booking,
        });

        let result: Value = self
            .store
            .request(Method::POST, "/rest/v1/rpc/commit_booking", Some(body))
            .await
            .map_err(map_store_error)?;

        if result["committed"].as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(BookingError::CounterConflict)
        }
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let path = format!("/rest/v1/bookings?id=eq.{}", booking_id);
        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(map_store_error)?;

        let row = result
            .into_iter()
            .next()
            .ok_or(BookingError::NotFound(booking_id))?;

        serde_json::from_value(row)
            .map_err(|e| BookingError::DatabaseError(format!("Failed to parse booking: {}", e)))
    }

    async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, BookingError> {
        let path = format!(
            "/rest/v1/bookings?user_id=eq.{}&order=booking_number.desc",
            user_id
        );
        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(map_store_error)?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Booking>, _>>()
            .map_err(|e| BookingError::DatabaseError(format!("Failed to parse bookings: {}", e)))
    }

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let path = format!("/rest/v1/bookings?id=eq.{}", booking_id);
        let body = json!({ "status": status.to_string() });

        let result: Vec<Value> = self
            .store
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(body),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(map_store_error)?;

        let row = result
            .into_iter()
            .next()
            .ok_or(BookingError::NotFound(booking_id))?;

        serde_json::from_value(row)
            .map_err(|e| BookingError::DatabaseError(format!("Failed to parse booking: {}", e)))
    }

    async fn insert_notification(&self, notification: &Notification) -> Result<(), BookingError> {
        let _: Vec<Value> = self
            .store
            .request_with_headers(
                Method::POST,
                "/rest/v1/notifications",
                Some(json!(notification)),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(map_store_error)?;

        Ok(())
    }

    async fn notification_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Notification>, BookingError> {
        let path = format!("/rest/v1/notifications?booking_id=eq.{}", booking_id);
        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(map_store_error)?;

        match result.into_iter().next() {
            Some(row) => serde_json::from_value(row).map(Some).map_err(|e| {
                BookingError::DatabaseError(format!("Failed to parse notification: {}", e))
            }),
            None => Ok(None),
        }
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, BookingError> {
        let path = format!(
            "/rest/v1/notifications?user_id=eq.{}&order=created_at.desc",
            user_id
        );
        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(map_store_error)?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Notification>, _>>()
            .map_err(|e| {
                BookingError::DatabaseError(format!("Failed to parse notifications: {}", e))
            })
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> Result<Notification, BookingError> {
        let path = format!("/rest/v1/notifications?id=eq.{}", notification_id);
        let body = json!({ "read": true });

        let result: Vec<Value> = self
            .store
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(body),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(map_store_error)?;

        let row = result
            .into_iter()
            .next()
            .ok_or(BookingError::NotFound(notification_id))?;

        serde_json::from_value(row).map_err(|e| {
            BookingError::DatabaseError(format!("Failed to parse notification: {}", e))
        })
    }
}
