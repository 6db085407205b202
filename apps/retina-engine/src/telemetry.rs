//! Tracing subscriber setup.
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides the configured level when set
//! - `observability.logging.format`: `json` | `pretty` | `compact`
//!
//! # Usage
//!
//! ```rust,ignore
//! use retina_engine::config::load_config;
//! use retina_engine::telemetry::init_tracing;
//!
//! let config = load_config(None)?;
//! init_tracing(&config.observability.logging);
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Initialize the global tracing subscriber.
///
/// Returns `false` when a subscriber was already installed; the existing
/// subscriber is kept.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    match result {
        Ok(()) => {
            tracing::debug!(level = %config.level, format = ?config.format, "Tracing initialized");
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_does_not_panic() {
        let config = LoggingConfig {
            format: LogFormat::Compact,
            ..LoggingConfig::default()
        };
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
