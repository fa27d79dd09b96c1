use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::error::BookingError;
use crate::models::CreateBookingRequest;
use crate::services::notification::NotificationService;
use crate::services::sequencer::BookingSequencer;
use crate::services::store::HttpBookingStore;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

fn build_sequencer(config: &AppConfig) -> (BookingSequencer, NotificationService) {
    let store = Arc::new(HttpBookingStore::new(config));
    (
        BookingSequencer::new(store.clone(), config.booking_max_attempts),
        NotificationService::new(store),
    )
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let (sequencer, notifications) = build_sequencer(&state);

    let booking = sequencer
        .create_booking(request)
        .await
        .map_err(map_booking_error)?;

    let notification = notifications
        .notify_booked(&booking)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "booking": booking,
        "notification": notification
    })))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, AppError> {
    let (sequencer, _) = build_sequencer(&state);

    let bookings = sequencer
        .list_bookings(query.user_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "bookings": bookings,
        "total": bookings.len()
    })))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<AppConfig>>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let (sequencer, _) = build_sequencer(&state);

    let booking = sequencer
        .cancel_booking(booking_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(booking)))
}

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, AppError> {
    let (_, notifications) = build_sequencer(&state);

    let records = notifications
        .list_for_user(query.user_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "notifications": records,
        "total": records.len()
    })))
}

#[axum::debug_handler]
pub async fn mark_notification_read(
    State(state): State<Arc<AppConfig>>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let (_, notifications) = build_sequencer(&state);

    let notification = notifications
        .mark_read(notification_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(notification)))
}

/// Booking failures must tell the user the booking did NOT succeed;
/// silent partial success would break the uniqueness invariant.
fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::CounterConflict | BookingError::MaxRetriesExceeded { .. } => {
            AppError::Conflict(
                "The booking was not created because of concurrent activity. Please retry."
                    .to_string(),
            )
        }
        BookingError::StoreUnavailable(msg) => {
            AppError::StoreUnavailable(format!("The booking was not created: {}", msg))
        }
        BookingError::NotFound(id) => AppError::NotFound(format!("Booking not found: {}", id)),
        BookingError::ValidationError(msg) => AppError::BadRequest(msg),
        BookingError::DatabaseError(msg) => AppError::Internal(msg),
    }
}
