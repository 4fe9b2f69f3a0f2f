//! Request handlers, one per resource and verb.

pub mod coaching;
pub mod exercises;
pub mod health;
pub mod patients;
pub mod prescriptions;
pub mod progress;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use rehab_core::validation::{self, Validate};
use serde_json::Value;

use crate::error::ApiError;

/// Validate a raw JSON body and convert it into the typed entity.
pub(crate) fn parse_body<T: Validate>(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(raw) = body?;
    Ok(validation::parse(raw)?)
}

/// Treat `?symptom=` the same as an absent filter.
pub(crate) fn non_empty(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|s| !s.is_empty())
}
