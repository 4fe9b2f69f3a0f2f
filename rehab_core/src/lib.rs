#![forbid(unsafe_code)]

//! Core domain model and business logic for the Rehab Portal.
//!
//! This crate provides:
//! - Domain types (exercises, patients, prescriptions, progress events)
//! - The entity store behind the `Repository` trait
//! - The threshold evaluator that turns metric observations into coaching feedback
//! - Explicit schema validation for raw request bodies
//! - A built-in default exercise catalog

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod evaluator;
pub mod validation;
pub mod timestamp;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use store::{InMemoryStore, Repository};
pub use evaluator::{evaluate, evaluate_observations, FeedbackLocale};
