use std::fmt;

use crate::config::ConfigurationError;
use crate::state_machine::{SnapshotError, StateMachineError};

/// Top-level error aggregate for embedding hosts.
#[derive(Debug)]
pub enum LabelflowError {
    StateTransitionError(String),
    PersistenceError(String),
    ConfigurationError(String),
    TelemetryError(String),
}

impl fmt::Display for LabelflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelflowError::StateTransitionError(msg) => {
                write!(f, "State transition error: {msg}")
            }
            LabelflowError::PersistenceError(msg) => write!(f, "Persistence error: {msg}"),
            LabelflowError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            LabelflowError::TelemetryError(msg) => write!(f, "Telemetry error: {msg}"),
        }
    }
}

impl std::error::Error for LabelflowError {}

impl From<StateMachineError> for LabelflowError {
    fn from(err: StateMachineError) -> Self {
        Self::StateTransitionError(err.to_string())
    }
}

impl From<SnapshotError> for LabelflowError {
    fn from(err: SnapshotError) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl From<ConfigurationError> for LabelflowError {
    fn from(err: ConfigurationError) -> Self {
        Self::ConfigurationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LabelflowError>;
