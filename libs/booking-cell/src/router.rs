use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::create_booking).get(handlers::list_bookings),
        )
        .route("/{booking_id}/cancel", patch(handlers::cancel_booking))
        .with_state(state)
}

pub fn notification_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route(
            "/{notification_id}/read",
            patch(handlers::mark_notification_read),
        )
        .with_state(state)
}
