//! Error types for the rehab_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rehab_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An entity with the given key is already stored
    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    /// A referenced key is absent
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Raw input failed schema validation
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A store lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,
}
