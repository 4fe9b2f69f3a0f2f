//! API error types with `{"detail": ...}` JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request body")]
    Unprocessable(Vec<String>),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, json!(detail)),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, json!(detail)),
            ApiError::Unprocessable(issues) => (StatusCode::UNPROCESSABLE_ENTITY, json!(issues)),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("An internal error occurred"),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<rehab_core::Error> for ApiError {
    fn from(err: rehab_core::Error) -> Self {
        use rehab_core::Error;

        match err {
            Error::AlreadyExists(_) => ApiError::BadRequest(err.to_string()),
            Error::NotFound(_) => ApiError::NotFound(err.to_string()),
            Error::Validation(issues) => ApiError::Unprocessable(issues),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(vec![format!("body: {}", rejection.body_text())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_bad_request() {
        let err = ApiError::from(rehab_core::Error::AlreadyExists("Exercise"));
        assert!(matches!(err, ApiError::BadRequest(ref d) if d == "Exercise already exists"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_maps_to_not_found() {
        let err = ApiError::from(rehab_core::Error::NotFound("Patient"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn poisoned_lock_is_internal() {
        let err = ApiError::from(rehab_core::Error::LockPoisoned);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
