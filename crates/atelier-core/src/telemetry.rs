//! Tracing setup
//!
//! Hosts call [`init_tracing`] once at startup. `RUST_LOG` overrides the
//! default filter.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single lines
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Subscriber installation failure
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("global subscriber already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Install the global tracing subscriber
///
/// `default_filter` applies when `RUST_LOG` is unset, e.g.
/// `"atelier_core=info,atelier_store=debug"`.
///
/// # Errors
/// Returns `TelemetryError` for a malformed filter or a second installation
pub fn init_tracing(format: LogFormat, default_filter: &str) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };

    let (compact, json) = match format {
        LogFormat::Compact => (Some(tracing_subscriber::fmt::layer().compact()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(json)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_fails() {
        // Another test may have installed a subscriber first
        let _ = init_tracing(LogFormat::Compact, "info");
        assert!(matches!(
            init_tracing(LogFormat::Json, "info"),
            Err(TelemetryError::AlreadyInstalled(_))
        ));
    }
}
