use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::CreateDoctorRequest;
use crate::services::DoctorService;

#[axum::debug_handler]
pub async fn register_doctor(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&config);

    let doctor = service.register_doctor(request)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&config);

    let doctors = service.list_doctors()
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn list_doctor_options(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&config);

    let options = service.doctor_options()
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!({
        "options": options,
        "total": options.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&config);

    let doctor = service.get_doctor(doctor_id)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!(doctor)))
}
