//! `POST /ai/coach` — coaching feedback for a progress event.
//!
//! Only the event's metric observations are consumed; the store is never
//! read, so unknown patients or exercises do not matter here.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use rehab_core::{evaluate_observations, CoachingReport, ProgressEvent};
use serde_json::Value;

use super::parse_body;
use crate::error::ApiError;
use crate::AppState;

pub async fn coach(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CoachingReport>, ApiError> {
    let event: ProgressEvent = parse_body(body)?;
    let feedback = evaluate_observations(&event.metrics, state.locale);
    Ok(Json(CoachingReport { feedback }))
}
