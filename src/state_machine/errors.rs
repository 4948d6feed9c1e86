use thiserror::Error;

/// Errors surfaced by [`LabelStateMachine`](super::machine::LabelStateMachine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    /// The current state defines no handler for the received event. The
    /// machine stays in its prior state; nothing is emitted.
    #[error("no transition from state `{state}` for event `{event}`")]
    InvalidTransition { state: String, event: String },
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;

/// Errors raised while encoding or decoding a persisted snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unknown state tag `{0}`")]
    UnknownStateTag(String),

    #[error("state `{state_tag}` requires workflow data, but the snapshot has none")]
    MissingWorkflowData { state_tag: String },

    #[error("state `{state_tag}` carries no workflow data, but the snapshot has some")]
    UnexpectedWorkflowData { state_tag: String },

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
