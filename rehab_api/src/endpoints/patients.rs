//! Patient endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use rehab_core::Patient;
use serde_json::Value;

use super::parse_body;
use crate::error::ApiError;
use crate::AppState;

/// `POST /patients`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    let patient: Patient = parse_body(body)?;
    Ok(Json(state.repo.create_patient(patient)?))
}

/// `GET /patients`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(state.repo.list_patients()?))
}

/// `GET /patients/:national_id`
pub async fn detail(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(state.repo.get_patient(&national_id)?))
}

/// `PUT /patients/:national_id`
pub async fn update(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    let patient: Patient = parse_body(body)?;
    Ok(Json(state.repo.update_patient(&national_id, patient)?))
}
