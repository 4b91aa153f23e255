//! Logging setup for binaries and tests.
//!
//! Installs a global tracing subscriber writing to stderr. `RUST_LOG`, when
//! set, takes precedence over the filter passed to [`init`].

use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The fallback filter directive could not be parsed.
    #[error("Invalid log filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },
    /// Another subscriber was installed outside this module.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing with `default_filter` (e.g. `"tabprep=info"`).
///
/// Subsequent calls are no-ops.
pub fn init(default_filter: &str) -> Result<(), LoggingError> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let env_filter = build_env_filter(default_filter)?;
    let subscriber = Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INITIALIZED.set(());

    tracing::debug!(filter = default_filter, "logging initialized");
    Ok(())
}

fn build_env_filter(default_filter: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter).map_err(|source| LoggingError::InvalidFilter {
            filter: default_filter.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(matches!(
            build_env_filter("tabprep=notalevel"),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_init_is_idempotent() {
        init("tabprep=warn").unwrap();
        init("tabprep=debug").unwrap();
    }
}
