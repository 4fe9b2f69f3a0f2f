//! Exercise endpoints.
//!
//! - `POST /exercises` — create
//! - `GET /exercises` — list, optionally `?symptom=`
//! - `GET|PUT|DELETE /exercises/:id`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use rehab_core::Exercise;
use serde::Deserialize;
use serde_json::Value;

use super::{non_empty, parse_body};
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
pub struct ExerciseListQuery {
    pub symptom: Option<String>,
}

/// `POST /exercises`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Exercise>, ApiError> {
    let exercise: Exercise = parse_body(body)?;
    Ok(Json(state.repo.create_exercise(exercise)?))
}

/// `GET /exercises`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ExerciseListQuery>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    let exercises = state.repo.list_exercises(non_empty(&query.symptom))?;
    Ok(Json(exercises))
}

/// `GET /exercises/:id`
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Exercise>, ApiError> {
    Ok(Json(state.repo.get_exercise(&id)?))
}

/// `PUT /exercises/:id` — wholesale replacement stored under the path id.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Exercise>, ApiError> {
    let exercise: Exercise = parse_body(body)?;
    Ok(Json(state.repo.update_exercise(&id, exercise)?))
}

/// `DELETE /exercises/:id`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.repo.delete_exercise(&id)?;
    Ok(Json(Value::Null))
}
