use tokio::sync::watch;

use super::data::{Address, AddressKind, OrderId, WorkflowData};
use super::errors::{SnapshotError, StateMachineError, StateMachineResult};
use super::events::FlowEvent;
use super::persistence::StateSnapshot;
use super::side_effects::{SideEffect, WorkflowError};
use super::states::{FlowState, FlowStep};
use crate::events::publisher::{EmittedEffect, SideEffectPublisher};

/// The result of one accepted event: the state entered and the side effect
/// the driver must perform. The same pair is published on the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: FlowState,
    pub side_effect: SideEffect,
}

/// The finite-state machine driving one shipping-label wizard session.
///
/// The machine is synchronous and single-owner: `handle_event` takes
/// `&mut self` and must be invoked serially. It performs no I/O of its own;
/// every interaction with the outside world is described by the
/// [`SideEffect`] of each transition and carried out by the driver, which
/// feeds the outcome back as the next [`FlowEvent`].
#[derive(Debug)]
pub struct LabelStateMachine {
    state: FlowState,
    effects: SideEffectPublisher,
}

impl LabelStateMachine {
    /// Create a machine in `Idle` with the effect channel primed to `NoOp`.
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            effects: SideEffectPublisher::new(),
        }
    }

    /// Start the wizard for the given order.
    ///
    /// Sugar for handling [`FlowEvent::FlowStarted`]; valid in `Idle` and,
    /// as the only way out, in `DataLoadingFailure`.
    pub fn start(&mut self, order_id: OrderId) -> StateMachineResult<Transition> {
        self.handle_event(FlowEvent::FlowStarted(order_id))
    }

    /// Apply an event to the current state.
    ///
    /// On success the machine moves to the returned state and the side
    /// effect is published. On an invalid `(state, event)` pair the machine
    /// stays exactly where it was, nothing is published, and
    /// [`StateMachineError::InvalidTransition`] is returned for the caller
    /// to log, ignore or escalate.
    pub fn handle_event(&mut self, event: FlowEvent) -> StateMachineResult<Transition> {
        let (next, side_effect) = Self::transition(&self.state, &event).map_err(|err| {
            tracing::warn!(
                state = self.state.state_tag(),
                event = event.event_type(),
                "rejected event with no transition"
            );
            err
        })?;

        tracing::debug!(
            from = self.state.state_tag(),
            to = next.state_tag(),
            event = event.event_type(),
            effect = side_effect.effect_type(),
            "applied transition"
        );

        self.state = next.clone();
        self.effects.emit(side_effect.clone());
        Ok(Transition {
            state: next,
            side_effect,
        })
    }

    /// The state the machine is currently parked in.
    pub fn current_state(&self) -> &FlowState {
        &self.state
    }

    /// The side effect currently held by the channel.
    pub fn latest_effect(&self) -> SideEffect {
        self.effects.latest().effect
    }

    /// Observe the latest emitted side effect.
    pub fn subscribe(&self) -> watch::Receiver<EmittedEffect> {
        self.effects.subscribe()
    }

    /// A serializable snapshot sufficient to reconstruct this machine.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::of(&self.state)
    }

    /// Reconstruct a machine from a persisted snapshot.
    ///
    /// The effect channel is primed to `NoOp`: restoring never re-emits the
    /// side effect that produced the snapshotted state, so resuming into
    /// `WaitingForInput` does not re-trigger a data load.
    pub fn restore(snapshot: &StateSnapshot) -> Result<Self, SnapshotError> {
        Ok(Self {
            state: snapshot.decode()?,
            effects: SideEffectPublisher::new(),
        })
    }

    /// The pure transition table: `(state, event) -> (next state, effect)`.
    ///
    /// The outer match is exhaustive over states, so adding a state without
    /// deciding its transitions fails the build. Within a state, events
    /// without a handler fall through to `InvalidTransition`.
    pub fn transition(
        state: &FlowState,
        event: &FlowEvent,
    ) -> StateMachineResult<(FlowState, SideEffect)> {
        use FlowEvent as E;
        use FlowState as S;

        let outcome = match state {
            S::Idle => match event {
                E::FlowStarted(order_id) => Some((
                    S::DataLoading,
                    SideEffect::LoadData(order_id.clone()),
                )),
                _ => None,
            },

            S::DataLoading => match event {
                E::DataLoaded {
                    origin,
                    destination,
                } => {
                    let data = WorkflowData::new(origin.clone(), destination.clone());
                    Some((
                        S::WaitingForInput(data.clone()),
                        SideEffect::UpdateViewState(data),
                    ))
                }
                E::DataLoadingFailed => Some((
                    S::DataLoadingFailure,
                    SideEffect::ShowError(WorkflowError::DataLoading),
                )),
                _ => None,
            },

            // Dead end except for restarting the whole workflow.
            S::DataLoadingFailure => match event {
                E::FlowStarted(order_id) => Some((
                    S::DataLoading,
                    SideEffect::LoadData(order_id.clone()),
                )),
                _ => None,
            },

            S::WaitingForInput(data) => match event {
                E::OriginAddressValidationStarted => Some((
                    S::OriginAddressValidation(data.clone()),
                    SideEffect::ValidateAddress {
                        address: data.origin_address.clone(),
                        kind: AddressKind::Origin,
                    },
                )),
                E::ShippingAddressValidationStarted => Some((
                    S::ShippingAddressValidation(data.clone()),
                    SideEffect::ValidateAddress {
                        address: data.shipping_address.clone(),
                        kind: AddressKind::Destination,
                    },
                )),
                E::EditOriginAddressRequested => Some((
                    S::OriginAddressEditing(data.clone()),
                    open_editor(&data.origin_address, AddressKind::Origin),
                )),
                E::EditShippingAddressRequested => Some((
                    S::ShippingAddressEditing(data.clone()),
                    open_editor(&data.shipping_address, AddressKind::Destination),
                )),
                E::PackageSelectionStarted | E::EditPackagingRequested => Some((
                    S::PackageSelection(data.clone()),
                    SideEffect::ShowPackageOptions,
                )),
                E::CustomsDeclarationStarted | E::EditCustomsRequested => Some((
                    S::CustomsDeclaration(data.clone()),
                    SideEffect::ShowCustomsForm,
                )),
                E::ShippingCarrierSelectionStarted | E::EditShippingCarrierRequested => Some((
                    S::ShippingCarrierSelection(data.clone()),
                    SideEffect::ShowCarrierOptions,
                )),
                E::PaymentSelectionStarted | E::EditPaymentRequested => Some((
                    S::PaymentSelection(data.clone()),
                    SideEffect::ShowPaymentDetails,
                )),
                _ => None,
            },

            S::OriginAddressValidation(data) => match event {
                E::AddressValidated(address) => Some(origin_resolved(data, address)),
                E::AddressInvalid { suggested } => Some((
                    S::OriginAddressSuggestion(data.clone()),
                    SideEffect::ShowAddressSuggestion {
                        entered: data.origin_address.clone(),
                        suggested: suggested.clone(),
                        kind: AddressKind::Origin,
                    },
                )),
                E::AddressNotRecognized => Some((
                    S::OriginAddressEditing(data.clone()),
                    open_editor(&data.origin_address, AddressKind::Origin),
                )),
                _ => None,
            },

            S::OriginAddressSuggestion(data) => match event {
                E::SuggestedAddressSelected(address) => Some(origin_resolved(data, address)),
                E::EditOriginAddressRequested => Some((
                    S::OriginAddressEditing(data.clone()),
                    open_editor(&data.origin_address, AddressKind::Origin),
                )),
                _ => None,
            },

            S::OriginAddressEditing(data) => match event {
                // User edits go through validation again.
                E::AddressEditFinished(address) => Some((
                    S::OriginAddressValidation(data.clone()),
                    SideEffect::ValidateAddress {
                        address: address.clone(),
                        kind: AddressKind::Origin,
                    },
                )),
                E::AddressUsedAsIs(address) => Some(origin_resolved(data, address)),
                E::AddressEditCanceled => Some((
                    S::WaitingForInput(data.clone()),
                    SideEffect::UpdateViewState(data.clone()),
                )),
                _ => None,
            },

            S::ShippingAddressValidation(data) => match event {
                E::AddressValidated(address) => Some(shipping_resolved(data, address)),
                E::AddressInvalid { suggested } => Some((
                    S::ShippingAddressSuggestion(data.clone()),
                    SideEffect::ShowAddressSuggestion {
                        entered: data.shipping_address.clone(),
                        suggested: suggested.clone(),
                        kind: AddressKind::Destination,
                    },
                )),
                E::AddressNotRecognized => Some((
                    S::ShippingAddressEditing(data.clone()),
                    open_editor(&data.shipping_address, AddressKind::Destination),
                )),
                _ => None,
            },

            S::ShippingAddressSuggestion(data) => match event {
                E::SuggestedAddressSelected(address) => Some(shipping_resolved(data, address)),
                E::EditShippingAddressRequested => Some((
                    S::ShippingAddressEditing(data.clone()),
                    open_editor(&data.shipping_address, AddressKind::Destination),
                )),
                _ => None,
            },

            S::ShippingAddressEditing(data) => match event {
                E::AddressEditFinished(address) => Some((
                    S::ShippingAddressValidation(data.clone()),
                    SideEffect::ValidateAddress {
                        address: address.clone(),
                        kind: AddressKind::Destination,
                    },
                )),
                E::AddressUsedAsIs(address) => Some(shipping_resolved(data, address)),
                E::AddressEditCanceled => Some((
                    S::WaitingForInput(data.clone()),
                    SideEffect::UpdateViewState(data.clone()),
                )),
                _ => None,
            },

            // Completion payloads stay with the host; the engine only
            // records that the sub-flow finished.
            S::PackageSelection(data) => match event {
                E::PackagesSelected { .. } => Some(step_completed(data, FlowStep::Customs)),
                _ => None,
            },

            S::CustomsDeclaration(data) => match event {
                E::CustomsFormFilledOut { .. } => Some(step_completed(data, FlowStep::Carrier)),
                _ => None,
            },

            S::ShippingCarrierSelection(data) => match event {
                E::ShippingCarrierSelected { .. } => Some(step_completed(data, FlowStep::Payment)),
                _ => None,
            },

            S::PaymentSelection(data) => match event {
                E::PaymentSelected { .. } => Some(step_completed(data, FlowStep::Done)),
                _ => None,
            },
        };

        outcome.ok_or_else(|| StateMachineError::InvalidTransition {
            state: state.state_tag().to_string(),
            event: event.event_type().to_string(),
        })
    }
}

impl Default for LabelStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Origin address settled: store it and unlock the shipping-address step.
fn origin_resolved(data: &WorkflowData, address: &Address) -> (FlowState, SideEffect) {
    let next = data
        .with_origin_address(address.clone())
        .completing(FlowStep::ShippingAddress);
    (
        FlowState::WaitingForInput(next.clone()),
        SideEffect::UpdateViewState(next),
    )
}

/// Shipping address settled: store it and unlock the packaging step.
fn shipping_resolved(data: &WorkflowData, address: &Address) -> (FlowState, SideEffect) {
    let next = data
        .with_shipping_address(address.clone())
        .completing(FlowStep::Packaging);
    (
        FlowState::WaitingForInput(next.clone()),
        SideEffect::UpdateViewState(next),
    )
}

/// A sub-flow finished: mark its successor step reachable and park.
fn step_completed(data: &WorkflowData, next_step: FlowStep) -> (FlowState, SideEffect) {
    let next = data.completing(next_step);
    (
        FlowState::WaitingForInput(next.clone()),
        SideEffect::UpdateViewState(next),
    )
}

fn open_editor(address: &Address, kind: AddressKind) -> SideEffect {
    SideEffect::OpenAddressEditor {
        address: address.clone(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(name: &str) -> Address {
        Address {
            name: name.to_string(),
            address_line1: "1 Main St".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            postcode: "97201".to_string(),
            country: "US".to_string(),
            ..Address::default()
        }
    }

    fn loaded_data() -> WorkflowData {
        WorkflowData::new(address("origin"), address("shipping"))
    }

    #[test]
    fn test_start_moves_to_data_loading() {
        let mut sm = LabelStateMachine::new();
        let transition = sm.start(OrderId::from("order-1")).unwrap();

        assert_eq!(transition.state, FlowState::DataLoading);
        assert_eq!(
            transition.side_effect,
            SideEffect::LoadData(OrderId::from("order-1"))
        );
        assert_eq!(sm.latest_effect(), transition.side_effect);
    }

    #[test]
    fn test_data_loaded_parks_waiting_for_input() {
        let (state, effect) = LabelStateMachine::transition(
            &FlowState::DataLoading,
            &FlowEvent::DataLoaded {
                origin: address("origin"),
                destination: address("shipping"),
            },
        )
        .unwrap();

        let expected = loaded_data();
        assert_eq!(state, FlowState::WaitingForInput(expected.clone()));
        assert_eq!(effect, SideEffect::UpdateViewState(expected));
    }

    #[test]
    fn test_origin_validation_round() {
        let data = loaded_data();

        let (state, effect) = LabelStateMachine::transition(
            &FlowState::WaitingForInput(data.clone()),
            &FlowEvent::OriginAddressValidationStarted,
        )
        .unwrap();
        assert_eq!(state, FlowState::OriginAddressValidation(data.clone()));
        assert_eq!(
            effect,
            SideEffect::ValidateAddress {
                address: data.origin_address.clone(),
                kind: AddressKind::Origin,
            }
        );

        let (state, _) = LabelStateMachine::transition(
            &state,
            &FlowEvent::AddressValidated(address("origin-normalized")),
        )
        .unwrap();
        let advanced = data
            .with_origin_address(address("origin-normalized"))
            .completing(FlowStep::ShippingAddress);
        assert_eq!(state, FlowState::WaitingForInput(advanced));
    }

    #[test]
    fn test_edit_finished_revalidates() {
        let data = loaded_data();
        let (state, effect) = LabelStateMachine::transition(
            &FlowState::OriginAddressEditing(data.clone()),
            &FlowEvent::AddressEditFinished(address("edited")),
        )
        .unwrap();

        assert_eq!(state, FlowState::OriginAddressValidation(data));
        assert_eq!(
            effect,
            SideEffect::ValidateAddress {
                address: address("edited"),
                kind: AddressKind::Origin,
            }
        );
    }

    #[test]
    fn test_edit_canceled_keeps_data() {
        let data = loaded_data();
        let (state, effect) = LabelStateMachine::transition(
            &FlowState::ShippingAddressEditing(data.clone()),
            &FlowEvent::AddressEditCanceled,
        )
        .unwrap();

        assert_eq!(state, FlowState::WaitingForInput(data.clone()));
        assert_eq!(effect, SideEffect::UpdateViewState(data));
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        // Cannot complete packages before the flow is started
        assert!(LabelStateMachine::transition(
            &FlowState::Idle,
            &FlowEvent::PackagesSelected { package_count: 1 }
        )
        .is_err());

        // Cannot restart mid-flight
        assert!(LabelStateMachine::transition(
            &FlowState::DataLoading,
            &FlowEvent::FlowStarted(OrderId::from("order-2"))
        )
        .is_err());

        // Data loading failure only accepts a restart
        assert!(LabelStateMachine::transition(
            &FlowState::DataLoadingFailure,
            &FlowEvent::DataLoadingFailed
        )
        .is_err());
        assert!(LabelStateMachine::transition(
            &FlowState::DataLoadingFailure,
            &FlowEvent::FlowStarted(OrderId::from("order-2"))
        )
        .is_ok());
    }

    #[test]
    fn test_rejected_event_leaves_machine_untouched() {
        let mut sm = LabelStateMachine::new();
        sm.start(OrderId::from("order-1")).unwrap();

        let err = sm.handle_event(FlowEvent::PackagesSelected { package_count: 1 }).unwrap_err();
        assert_eq!(
            err,
            StateMachineError::InvalidTransition {
                state: "data_loading".to_string(),
                event: "packages_selected".to_string(),
            }
        );
        assert_eq!(sm.current_state(), &FlowState::DataLoading);
        // the channel still holds the effect of the last accepted event
        assert_eq!(
            sm.latest_effect(),
            SideEffect::LoadData(OrderId::from("order-1"))
        );
    }

    #[test]
    fn test_restore_does_not_re_emit() {
        let mut sm = LabelStateMachine::new();
        sm.start(OrderId::from("order-1")).unwrap();
        sm.handle_event(FlowEvent::DataLoaded {
            origin: address("origin"),
            destination: address("shipping"),
        })
        .unwrap();

        let restored = LabelStateMachine::restore(&sm.snapshot()).unwrap();
        assert_eq!(restored.current_state(), sm.current_state());
        assert_eq!(restored.latest_effect(), SideEffect::NoOp);
    }
}
