use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TelemetryConfig;
use crate::error::{LabelflowError, Result};

/// Install the global tracing subscriber for an embedding host.
///
/// Hosts that already install their own subscriber should simply not call
/// this; every log line in the crate goes through `tracing` regardless.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| LabelflowError::ConfigurationError(format!("bad log_level: {e}")))?;

    let result = if config.json_output {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .try_init()
    };

    result.map_err(|e| LabelflowError::TelemetryError(e.to_string()))?;

    tracing::debug!("telemetry initialized");
    Ok(())
}
