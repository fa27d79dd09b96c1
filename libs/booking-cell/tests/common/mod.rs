#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use booking_cell::error::BookingError;
use booking_cell::models::{Booking, BookingStatus, Notification};
use booking_cell::services::store::BookingStore;

#[derive(Default)]
struct MemoryState {
    counter: i64,
    bookings: HashMap<Uuid, Booking>,
    notifications: HashMap<Uuid, Notification>,
}

/// In-memory store with real compare-and-swap semantics, used to exercise
/// the sequencer's concurrency behavior hermetically.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    pub always_conflict: bool,
    pub unavailable: bool,
}

impl MemoryStore {
    pub fn new(counter: i64) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                counter,
                ..Default::default()
            }),
            always_conflict: false,
            unavailable: false,
        }
    }

    pub fn always_conflicting(counter: i64) -> Self {
        Self {
            always_conflict: true,
            ..Self::new(counter)
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(0)
        }
    }

    pub fn counter(&self) -> i64 {
        self.state.lock().unwrap().counter
    }

    pub fn booking_numbers(&self) -> Vec<i64> {
        let mut numbers: Vec<i64> = self
            .state
            .lock()
            .unwrap()
            .bookings
            .values()
            .map(|b| b.booking_number)
            .collect();
        numbers.sort_unstable();
        numbers
    }

    pub fn stored_notifications(&self) -> usize {
        self.state.lock().unwrap().notifications.len()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn read_counter(&self) -> Result<i64, BookingError> {
        if self.unavailable {
            return Err(BookingError::StoreUnavailable("connection refused".to_string()));
        }
        Ok(self.state.lock().unwrap().counter)
    }

    async fn commit_booking(&self, expected: i64, booking: &Booking) -> Result<(), BookingError> {
        if self.unavailable {
            return Err(BookingError::StoreUnavailable("connection refused".to_string()));
        }
        if self.always_conflict {
            return Err(BookingError::CounterConflict);
        }

        let mut state = self.state.lock().unwrap();
        if state.counter != expected {
            return Err(BookingError::CounterConflict);
        }

        state.counter = booking.booking_number;
        state.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        self.state
            .lock()
            .unwrap()
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or(BookingError::NotFound(booking_id))
    }

    async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, BookingError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let mut state = self.state.lock().unwrap();
        let booking = state
            .bookings
            .get_mut(&booking_id)
            .ok_or(BookingError::NotFound(booking_id))?;
        booking.status = status;
        Ok(booking.clone())
    }

    async fn insert_notification(&self, notification: &Notification) -> Result<(), BookingError> {
        self.state
            .lock()
            .unwrap()
            .notifications
            .insert(notification.id, notification.clone());
        Ok(())
    }

    async fn notification_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Notification>, BookingError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .notifications
            .values()
            .find(|n| n.booking_id == booking_id)
            .cloned())
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, BookingError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> Result<Notification, BookingError> {
        let mut state = self.state.lock().unwrap();
        let notification = state
            .notifications
            .get_mut(&notification_id)
            .ok_or(BookingError::NotFound(notification_id))?;
        notification.read = true;
        Ok(notification.clone())
    }
}
