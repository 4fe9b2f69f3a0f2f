#![forbid(unsafe_code)]

//! HTTP surface of the Rehab Portal.
//!
//! `router::app` returns a composable `Router` over an injected
//! `Repository`, so tests and the binary share the same wiring.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;

use rehab_core::{FeedbackLocale, Repository};
use std::sync::Arc;

pub use error::ApiError;
pub use router::app;

/// Shared state handed to every endpoint
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub locale: FeedbackLocale,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, locale: FeedbackLocale) -> Self {
        Self { repo, locale }
    }
}
