use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{ChatError, SendMessageRequest};
use crate::services::session::ChatService;

#[axum::debug_handler]
pub async fn create_session(State(service): State<Arc<ChatService>>) -> Json<Value> {
    let session_id = service.create_session().await;
    Json(json!({ "session_id": session_id }))
}

#[axum::debug_handler]
pub async fn get_session(
    State(service): State<Arc<ChatService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let state = service
        .get_session(session_id)
        .await
        .map_err(map_chat_error)?;

    Ok(Json(json!(state)))
}

#[axum::debug_handler]
pub async fn send_message(
    State(service): State<Arc<ChatService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let turn = service
        .handle_message(session_id, request)
        .await
        .map_err(map_chat_error)?;

    Ok(Json(json!(turn)))
}

fn map_chat_error(e: ChatError) -> AppError {
    match e {
        ChatError::SessionNotFound => AppError::NotFound("Chat session not found".to_string()),
        ChatError::ValidationError(msg) => AppError::BadRequest(msg),
        ChatError::GeneratorUnavailable(msg) => AppError::ExternalService(msg),
    }
}
