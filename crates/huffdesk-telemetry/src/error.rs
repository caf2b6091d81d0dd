//! Error types for telemetry operations.

use thiserror::Error;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised while installing logging or operating the metrics registry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Installing the tracing subscriber failed.
    #[error("failed to install tracing subscriber")]
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        source: tracing_subscriber::util::TryInitError,
    },
    /// A collector could not be built or registered.
    #[error("failed to set up metrics collector")]
    Collector {
        /// Step that failed: `build` or `register`.
        operation: &'static str,
        /// Metric name.
        name: &'static str,
        /// Underlying Prometheus error.
        source: prometheus::Error,
    },
    /// The registry could not be rendered as Prometheus text.
    #[error("failed to render metrics")]
    Render {
        /// Underlying Prometheus error.
        source: prometheus::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn collector_errors_keep_name_and_source() {
        let err = TelemetryError::Collector {
            operation: "register",
            name: "jobs_total",
            source: prometheus::Error::AlreadyReg,
        };
        assert_eq!(err.to_string(), "failed to set up metrics collector");
        assert!(err.source().is_some());
        assert!(matches!(
            err,
            TelemetryError::Collector {
                operation: "register",
                name: "jobs_total",
                ..
            }
        ));
    }

    #[test]
    fn render_errors_have_a_constant_message() {
        let err = TelemetryError::Render {
            source: prometheus::Error::Msg("encode".to_string()),
        };
        assert_eq!(err.to_string(), "failed to render metrics");
        assert!(err.source().is_some());
    }
}
