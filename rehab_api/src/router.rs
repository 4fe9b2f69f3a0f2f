//! Router for the portal API.
//!
//! Layers (outermost first): CORS → request tracing → handler.
//! CORS is fully permissive, matching the portal's prototype posture.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::endpoints;
use crate::AppState;

/// Build the portal router over the given state.
///
/// NOTE: Path params use `:param` syntax (axum 0.7).
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/exercises",
            post(endpoints::exercises::create).get(endpoints::exercises::list),
        )
        .route(
            "/exercises/:id",
            get(endpoints::exercises::detail)
                .put(endpoints::exercises::update)
                .delete(endpoints::exercises::remove),
        )
        .route(
            "/patients",
            post(endpoints::patients::create).get(endpoints::patients::list),
        )
        .route(
            "/patients/:national_id",
            get(endpoints::patients::detail).put(endpoints::patients::update),
        )
        .route(
            "/patients/:national_id/progress",
            get(endpoints::progress::history).post(endpoints::progress::record),
        )
        .route(
            "/prescriptions",
            post(endpoints::prescriptions::create).get(endpoints::prescriptions::list),
        )
        .route("/prescriptions/:id", get(endpoints::prescriptions::detail))
        .route("/ai/coach", post(endpoints::coaching::coach))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}
