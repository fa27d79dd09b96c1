use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;
use crate::services::session::ChatService;

pub fn chat_routes(config: Arc<AppConfig>) -> Router {
    // One service instance per router: the session map must outlive
    // individual requests.
    let service = Arc::new(ChatService::new(&config));

    Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{session_id}", get(handlers::get_session))
        .route(
            "/sessions/{session_id}/messages",
            post(handlers::send_message),
        )
        .with_state(service)
}
