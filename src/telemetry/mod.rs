//! Tracing subscriber setup.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from `log.level`.
//! `log.json` switches the fmt layer to JSON lines for log shippers.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogSettings;

/// Telemetry-specific error type
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),
    #[error("Failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &LogSettings) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| TelemetryError::Filter(e.to_string()))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    tracing::info!(level = %config.level, json = config.json, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_fails() {
        let config = LogSettings::default();

        // Another test binary may already own the global subscriber
        let _ = init_tracing(&config);
        let second = init_tracing(&config);
        assert!(matches!(second, Err(TelemetryError::Init(_))));
    }
}
