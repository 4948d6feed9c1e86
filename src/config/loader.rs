//! Configuration Loader
//!
//! Layered configuration loading: built-in defaults, then an optional
//! `labelflow.yaml` (plus an environment-specific overlay), then
//! `LABELFLOW_*` environment variables. The merged result is validated
//! before use.

use std::path::Path;

use config::{Config, File};
use tracing::debug;

use super::error::ConfigResult;
use super::{Environment, LabelflowConfig};

/// Owns the merged configuration for one embedding host.
pub struct ConfigManager {
    config: LabelflowConfig,
    environment: Environment,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection, looking for
    /// `labelflow.yaml` in the working directory.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from_directory(Path::new("."))
    }

    /// Load configuration from a specific directory.
    pub fn load_from_directory(config_dir: &Path) -> ConfigResult<Self> {
        let environment = Environment::detect();

        let base = config_dir.join("labelflow");
        let overlay = config_dir.join(format!("labelflow.{environment}"));

        let merged = Config::builder()
            .add_source(Config::try_from(&LabelflowConfig::default())?)
            .add_source(File::from(base).required(false))
            .add_source(File::from(overlay).required(false))
            .add_source(
                config::Environment::with_prefix("LABELFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: LabelflowConfig = merged.try_deserialize()?;
        config.validate()?;

        debug!(%environment, "configuration loaded");

        Ok(Self {
            config,
            environment,
        })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &LabelflowConfig {
        &self.config
    }

    /// The environment the configuration was loaded for
    pub fn environment(&self) -> Environment {
        self.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_files_uses_defaults() {
        let manager = ConfigManager::load_from_directory(Path::new("/nonexistent")).unwrap();
        assert_eq!(manager.config().telemetry.log_level, "info");
    }
}
