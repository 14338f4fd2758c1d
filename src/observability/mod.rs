//! Observability
//!
//! Structured logging for the identity endpoint: a tracing subscriber
//! initialized once at startup, plus the [`SecurityEvent`] vocabulary and
//! the [`security_event!`] macro for audit-grade events.
//!
//! Event payloads never include credentials or password hashes; callers
//! log account ids and emails, nothing more sensitive.
//!
//! [`security_event!`]: crate::security_event

mod events;

pub use events::{SecurityEvent, Severity};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ============================================================================
// Configuration
// ============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output for development.
    Pretty,
    /// One JSON object per event, for log aggregation.
    Json,
    /// Single-line human-readable output.
    #[default]
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Output format for the stdout layer.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl ObservabilityConfig {
    /// Read format and filter from `LOG_FORMAT` and `RUST_LOG`, falling
    /// back to defaults for anything unset or unrecognized.
    pub fn from_env() -> Self {
        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("pretty") => LogFormat::Pretty,
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };
        let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            log_filter,
            log_format,
        }
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the tracing subscriber based on configuration.
///
/// Call once at startup, before the first request. A second call fails
/// because the global subscriber is already set.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|e| ObservabilityError::Config(format!("Invalid log filter: {}", e)))?;

    let subscriber = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
                .map_err(|e| ObservabilityError::Provider(format!("Failed to init tracing: {}", e)))?;
        }
        LogFormat::Json => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
                .map_err(|e| ObservabilityError::Provider(format!("Failed to init tracing: {}", e)))?;
        }
        LogFormat::Compact => {
            subscriber
                .with(fmt::layer().compact().with_target(true))
                .try_init()
                .map_err(|e| ObservabilityError::Provider(format!("Failed to init tracing: {}", e)))?;
        }
    }

    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

/// Observability setup errors.
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    /// A configuration value could not be parsed.
    #[error("observability configuration error: {0}")]
    Config(String),

    /// The subscriber could not be installed.
    #[error("observability provider error: {0}")]
    Provider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_compact_info() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.log_format, LogFormat::Compact);
        assert_eq!(config.log_filter, "info");
    }
}
