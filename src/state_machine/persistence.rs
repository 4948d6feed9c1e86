use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::data::WorkflowData;
use super::errors::SnapshotError;
use super::states::FlowState;

/// The persisted form of a workflow state: a discriminant tag plus the
/// workflow data for states that carry one. Data-less states (`idle`,
/// `data_loading`, `data_loading_failure`) omit the payload entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_data: Option<WorkflowData>,
}

impl StateSnapshot {
    /// Capture the given state.
    pub fn of(state: &FlowState) -> Self {
        Self {
            state_tag: state.state_tag().to_string(),
            workflow_data: state.workflow_data().cloned(),
        }
    }

    /// Reconstruct the state this snapshot was captured from.
    ///
    /// Decoding is strict: unknown tags and tag/payload mismatches are
    /// rejected rather than papered over.
    pub fn decode(&self) -> Result<FlowState, SnapshotError> {
        match self.state_tag.as_str() {
            "idle" => self.without_data(FlowState::Idle),
            "data_loading" => self.without_data(FlowState::DataLoading),
            "data_loading_failure" => self.without_data(FlowState::DataLoadingFailure),
            "waiting_for_input" => self.with_data(FlowState::WaitingForInput),
            "origin_address_validation" => self.with_data(FlowState::OriginAddressValidation),
            "origin_address_suggestion" => self.with_data(FlowState::OriginAddressSuggestion),
            "origin_address_editing" => self.with_data(FlowState::OriginAddressEditing),
            "shipping_address_validation" => self.with_data(FlowState::ShippingAddressValidation),
            "shipping_address_suggestion" => self.with_data(FlowState::ShippingAddressSuggestion),
            "shipping_address_editing" => self.with_data(FlowState::ShippingAddressEditing),
            "package_selection" => self.with_data(FlowState::PackageSelection),
            "customs_declaration" => self.with_data(FlowState::CustomsDeclaration),
            "shipping_carrier_selection" => self.with_data(FlowState::ShippingCarrierSelection),
            "payment_selection" => self.with_data(FlowState::PaymentSelection),
            other => Err(SnapshotError::UnknownStateTag(other.to_string())),
        }
    }

    /// Serialize to the canonical JSON layout.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from the canonical JSON layout.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    fn without_data(&self, state: FlowState) -> Result<FlowState, SnapshotError> {
        match self.workflow_data {
            None => Ok(state),
            Some(_) => Err(SnapshotError::UnexpectedWorkflowData {
                state_tag: self.state_tag.clone(),
            }),
        }
    }

    fn with_data(
        &self,
        build: impl FnOnce(WorkflowData) -> FlowState,
    ) -> Result<FlowState, SnapshotError> {
        match &self.workflow_data {
            Some(data) => Ok(build(data.clone())),
            None => Err(SnapshotError::MissingWorkflowData {
                state_tag: self.state_tag.clone(),
            }),
        }
    }
}

/// Session-keyed snapshot persistence.
///
/// The engine only produces and consumes [`StateSnapshot`] values; where
/// they live between process restarts is the host's decision, behind this
/// trait.
pub trait SnapshotStore: Send + Sync {
    fn save(&self, session_id: Uuid, snapshot: StateSnapshot);

    fn load(&self, session_id: Uuid) -> Option<StateSnapshot>;

    fn remove(&self, session_id: Uuid) -> Option<StateSnapshot>;
}

/// In-process store, mainly for tests and single-process hosts.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshots: RwLock<HashMap<Uuid, StateSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, session_id: Uuid, snapshot: StateSnapshot) {
        self.snapshots.write().insert(session_id, snapshot);
    }

    fn load(&self, session_id: Uuid) -> Option<StateSnapshot> {
        self.snapshots.read().get(&session_id).cloned()
    }

    fn remove(&self, session_id: Uuid) -> Option<StateSnapshot> {
        self.snapshots.write().remove(&session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::data::Address;

    fn sample_data() -> WorkflowData {
        WorkflowData::new(
            Address {
                name: "origin".to_string(),
                ..Address::default()
            },
            Address {
                name: "shipping".to_string(),
                ..Address::default()
            },
        )
    }

    #[test]
    fn test_data_less_snapshot_omits_payload() {
        let snapshot = StateSnapshot::of(&FlowState::Idle);
        assert_eq!(snapshot.to_json().unwrap(), r#"{"state_tag":"idle"}"#);
    }

    #[test]
    fn test_snapshot_round_trip_with_payload() {
        let state = FlowState::PackageSelection(sample_data());
        let snapshot = StateSnapshot::of(&state);

        let json = snapshot.to_json().unwrap();
        let parsed = StateSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed.decode().unwrap(), state);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let snapshot = StateSnapshot {
            state_tag: "purchasing".to_string(),
            workflow_data: None,
        };
        assert!(matches!(
            snapshot.decode(),
            Err(SnapshotError::UnknownStateTag(tag)) if tag == "purchasing"
        ));
    }

    #[test]
    fn test_missing_payload_is_rejected() {
        let snapshot = StateSnapshot {
            state_tag: "waiting_for_input".to_string(),
            workflow_data: None,
        };
        assert!(matches!(
            snapshot.decode(),
            Err(SnapshotError::MissingWorkflowData { .. })
        ));
    }

    #[test]
    fn test_unexpected_payload_is_rejected() {
        let snapshot = StateSnapshot {
            state_tag: "data_loading".to_string(),
            workflow_data: Some(sample_data()),
        };
        assert!(matches!(
            snapshot.decode(),
            Err(SnapshotError::UnexpectedWorkflowData { .. })
        ));
    }

    #[test]
    fn test_in_memory_store_round_trip() {
        let store = InMemorySnapshotStore::new();
        let session_id = Uuid::new_v4();
        let snapshot = StateSnapshot::of(&FlowState::WaitingForInput(sample_data()));

        assert!(store.load(session_id).is_none());
        store.save(session_id, snapshot.clone());
        assert_eq!(store.load(session_id), Some(snapshot.clone()));
        assert_eq!(store.remove(session_id), Some(snapshot));
        assert!(store.load(session_id).is_none());
    }
}
