use std::sync::Arc;

use axum::{routing::get, Router};

use booking_cell::router::{booking_routes, notification_routes};
use chat_cell::router::chat_routes;
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "MediLink API is running!" }))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/chat", chat_routes(state.clone()))
        .nest("/bookings", booking_routes(state.clone()))
        .nest("/notifications", notification_routes(state))
}
