//! # Labelflow Configuration System
//!
//! Environment-aware configuration for embedding hosts. All values have
//! working defaults; a `labelflow.yaml` file and `LABELFLOW_*` environment
//! variables layer on top (see [`loader::ConfigManager`]).

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelflowConfig {
    /// System-wide settings
    pub system: SystemConfig,

    /// Logging and telemetry settings
    pub telemetry: TelemetryConfig,
}

impl LabelflowConfig {
    /// Explicit validation: no silent fallbacks for malformed values.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.telemetry.log_level.trim().is_empty() {
            return Err(ConfigurationError::Invalid(
                "telemetry.log_level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// System-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub environment: Environment,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            environment: Environment::detect(),
        }
    }
}

/// Deployment environment, detected from `LABELFLOW_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Read `LABELFLOW_ENV`, defaulting to `Development` when unset or
    /// unrecognized.
    pub fn detect() -> Self {
        match std::env::var("LABELFLOW_ENV").as_deref() {
            Ok("production") => Self::Production,
            Ok("test") => Self::Test,
            _ => Self::Development,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Test => write!(f, "test"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Logging and telemetry settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Master switch for subscriber installation
    pub enabled: bool,
    /// `tracing_subscriber::EnvFilter` directive, e.g. `labelflow_core=debug`
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    pub json_output: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            json_output: false,
        }
    }
}
