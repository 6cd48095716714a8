//! Tracing subscriber and metrics recorder installation.

use metrics_exporter_prometheus::PrometheusHandle;
use termbus_settings::LoggingSettings;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Errors raised while installing logging or metrics.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The log filter directives could not be parsed.
    #[error("invalid log filter {directives:?}: {source}")]
    Filter {
        /// Directives that failed.
        directives: String,
        /// Parser error.
        #[source]
        source: ParseError,
    },

    /// A global tracing subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),

    /// The Prometheus recorder could not be installed.
    #[error("failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Parse filter directives such as `info,termbus_server=debug`.
pub fn filter_from(directives: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directives).map_err(|source| TelemetryError::Filter {
        directives: directives.to_string(),
        source,
    })
}

/// Install the global tracing subscriber.
///
/// A non-empty `RUST_LOG` takes precedence over `settings.level`.
pub fn init_tracing(settings: &LoggingSettings) -> Result<(), TelemetryError> {
    let directives = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => settings.level.clone(),
    };
    let registry = tracing_subscriber::registry().with(filter_from(&directives)?);
    if settings.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }
    Ok(())
}

/// Install tracing and the Prometheus recorder in one step.
pub fn init(settings: &LoggingSettings) -> Result<PrometheusHandle, TelemetryError> {
    init_tracing(settings)?;
    Ok(crate::metrics::install_recorder()?)
}
