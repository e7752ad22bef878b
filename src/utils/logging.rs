//! Tracing subscriber initialization.
//!
//! Diagnostics go to stderr so stdout stays free for summaries and JSON
//! output. Respects `RUST_LOG`, defaulting to `info`.

use std::io::IsTerminal;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global stderr subscriber
///
/// # Errors
///
/// Returns [`LoggingError::SubscriberAlreadySet`] if called twice.
pub fn init() -> Result<(), LoggingError> {
    let stderr = std::io::stderr();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(stderr.is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let _ = init();
        assert!(matches!(init(), Err(LoggingError::SubscriberAlreadySet)));
    }
}
