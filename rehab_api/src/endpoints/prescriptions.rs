//! Prescription endpoints.
//!
//! Prescriptions are append-only: there is no update or delete route.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use rehab_core::Prescription;
use serde::Deserialize;
use serde_json::Value;

use super::{non_empty, parse_body};
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
pub struct PrescriptionListQuery {
    pub patient_id: Option<String>,
}

/// `POST /prescriptions`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Prescription>, ApiError> {
    let prescription: Prescription = parse_body(body)?;
    Ok(Json(state.repo.create_prescription(prescription)?))
}

/// `GET /prescriptions`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PrescriptionListQuery>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    let prescriptions = state.repo.list_prescriptions(non_empty(&query.patient_id))?;
    Ok(Json(prescriptions))
}

/// `GET /prescriptions/:id`
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Prescription>, ApiError> {
    Ok(Json(state.repo.get_prescription(&id)?))
}
