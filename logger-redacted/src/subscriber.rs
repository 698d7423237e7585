// Global tracing subscriber setup
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggerConfig;
use crate::redactor::{PiiRedactor, RedactionConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Invalid log filter '{0}': {1}")]
    InvalidFilter(String, String),
    #[error("Logger already initialised: {0}")]
    AlreadyInitialised(String),
}

/// Build the filter: `RUST_LOG` wins, otherwise the configured level.
pub fn build_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| LoggerError::InvalidFilter(config.log_level.clone(), e.to_string())),
    }
}

/// Install the global subscriber and hand back the redactor callers should
/// run payloads through before logging them.
pub fn init(config: &LoggerConfig) -> Result<PiiRedactor, LoggerError> {
    let filter = build_filter(config)?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_current_span(false).with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    result.map_err(|e| LoggerError::AlreadyInitialised(e.to_string()))?;

    let redaction = if config.redaction_enabled {
        RedactionConfig::default()
    } else {
        RedactionConfig::disabled()
    };

    Ok(PiiRedactor::new(redaction))
}
