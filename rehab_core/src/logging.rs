//! Logging infrastructure for the Rehab Portal.
//!
//! Provides centralized tracing setup for the server binary.

use crate::{Error, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber for the server
///
/// `directive` is the filter used when RUST_LOG is unset (e.g. `debug`,
/// `rehab_core=trace,tower_http=debug`). Fails when the directive does not
/// parse or a subscriber is already installed.
pub fn init_with_level(directive: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive)
            .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", directive, e)))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install logger: {}", e)))
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = init_with_level("rehab_core=loud").unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }
}
