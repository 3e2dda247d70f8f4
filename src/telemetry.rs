//! Structured logging setup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Variable holding the `tracing` filter directives.
pub const LOG_FILTER_ENV: &str = "TASKTRACKER_LOG";

const DEFAULT_FILTER: &str = "info";

/// Error returned when the global subscriber cannot be installed.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(String);

/// Installs a formatted `tracing` subscriber as the global default.
///
/// Filter directives come from [`LOG_FILTER_ENV`], falling back to `info`.
///
/// # Errors
///
/// Returns [`TelemetryError`] when a global subscriber is already set.
pub fn init_tracing() -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| TelemetryError(err.to_string()))
}
