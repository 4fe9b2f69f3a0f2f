//! Progress endpoints, nested under a patient.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use rehab_core::ProgressEvent;
use serde_json::Value;

use super::parse_body;
use crate::error::ApiError;
use crate::AppState;

/// `GET /patients/:national_id/progress` — events in append order.
pub async fn history(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
) -> Result<Json<Vec<ProgressEvent>>, ApiError> {
    Ok(Json(state.repo.get_progress(&national_id)?))
}

/// `POST /patients/:national_id/progress`
pub async fn record(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProgressEvent>, ApiError> {
    let event: ProgressEvent = parse_body(body)?;
    Ok(Json(state.repo.add_progress(&national_id, event)?))
}
