use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::DoctorError;
use crate::services::roster::RosterService;

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let roster_service = RosterService::new(&state);

    let doctors = roster_service
        .list_doctors()
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let roster_service = RosterService::new(&state);

    let doctor = roster_service
        .get_doctor(&doctor_id)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!(doctor)))
}

fn map_doctor_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
        DoctorError::RosterUnavailable(msg) => AppError::StoreUnavailable(msg),
        DoctorError::DatabaseError(msg) => AppError::Internal(msg),
    }
}
