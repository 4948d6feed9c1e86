//! Snapshot Round-Trip Tests
//!
//! Every reachable state must survive snapshot → JSON → restore unchanged,
//! and restoring must never replay the side effect that produced the state.

use std::io::Write;

use labelflow_core::{
    Address, FlowEvent, FlowState, LabelStateMachine, OrderId, SideEffect, StateSnapshot,
};

fn address(name: &str) -> Address {
    Address {
        name: name.to_string(),
        address_line1: "1 Ferry Building".to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        postcode: "94111".to_string(),
        country: "US".to_string(),
        ..Address::default()
    }
}

/// Event sequences that park the machine in each reachable state.
fn reachable_sequences() -> Vec<Vec<FlowEvent>> {
    let load = vec![
        FlowEvent::FlowStarted(OrderId::from("order-1")),
        FlowEvent::DataLoaded {
            origin: address("origin"),
            destination: address("shipping"),
        },
    ];
    let with_load = |tail: &[FlowEvent]| {
        let mut sequence = load.clone();
        sequence.extend_from_slice(tail);
        sequence
    };

    vec![
        vec![],
        vec![FlowEvent::FlowStarted(OrderId::from("order-1"))],
        vec![
            FlowEvent::FlowStarted(OrderId::from("order-1")),
            FlowEvent::DataLoadingFailed,
        ],
        with_load(&[]),
        with_load(&[FlowEvent::OriginAddressValidationStarted]),
        with_load(&[
            FlowEvent::OriginAddressValidationStarted,
            FlowEvent::AddressInvalid {
                suggested: address("origin-suggested"),
            },
        ]),
        with_load(&[FlowEvent::EditOriginAddressRequested]),
        with_load(&[FlowEvent::ShippingAddressValidationStarted]),
        with_load(&[
            FlowEvent::ShippingAddressValidationStarted,
            FlowEvent::AddressInvalid {
                suggested: address("ship-suggested"),
            },
        ]),
        with_load(&[FlowEvent::EditShippingAddressRequested]),
        with_load(&[FlowEvent::PackageSelectionStarted]),
        with_load(&[FlowEvent::CustomsDeclarationStarted]),
        with_load(&[FlowEvent::ShippingCarrierSelectionStarted]),
        with_load(&[FlowEvent::PaymentSelectionStarted]),
    ]
}

fn machine_after(events: &[FlowEvent]) -> LabelStateMachine {
    let mut sm = LabelStateMachine::new();
    for event in events {
        sm.handle_event(event.clone()).unwrap();
    }
    sm
}

#[test]
fn test_round_trip_preserves_every_reachable_state() {
    for sequence in reachable_sequences() {
        let sm = machine_after(&sequence);

        let json = sm.snapshot().to_json().unwrap();
        let restored = LabelStateMachine::restore(&StateSnapshot::from_json(&json).unwrap())
            .unwrap_or_else(|e| panic!("restore failed for {json}: {e}"));

        assert_eq!(restored.current_state(), sm.current_state());
    }
}

#[test]
fn test_restore_never_re_emits() {
    for sequence in reachable_sequences() {
        let sm = machine_after(&sequence);
        let restored = LabelStateMachine::restore(&sm.snapshot()).unwrap();

        assert_eq!(restored.latest_effect(), SideEffect::NoOp);
    }
}

#[test]
fn test_restored_machine_keeps_working() {
    let sm = machine_after(&[
        FlowEvent::FlowStarted(OrderId::from("order-1")),
        FlowEvent::DataLoaded {
            origin: address("origin"),
            destination: address("shipping"),
        },
    ]);

    let mut restored = LabelStateMachine::restore(&sm.snapshot()).unwrap();
    let transition = restored
        .handle_event(FlowEvent::OriginAddressValidationStarted)
        .unwrap();

    assert!(matches!(
        transition.state,
        FlowState::OriginAddressValidation(_)
    ));
}

#[test]
fn test_snapshot_survives_a_file_round_trip() {
    let sm = machine_after(&[
        FlowEvent::FlowStarted(OrderId::from("order-1")),
        FlowEvent::DataLoaded {
            origin: address("origin"),
            destination: address("shipping"),
        },
        FlowEvent::PackageSelectionStarted,
    ]);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(sm.snapshot().to_json().unwrap().as_bytes())
        .unwrap();

    let json = std::fs::read_to_string(file.path()).unwrap();
    let restored = LabelStateMachine::restore(&StateSnapshot::from_json(&json).unwrap()).unwrap();

    assert_eq!(restored.current_state(), sm.current_state());
}

#[test]
fn test_malformed_snapshots_are_rejected() {
    assert!(StateSnapshot::from_json("not json").is_err());

    let unknown_tag = r#"{"state_tag":"purchase_labels"}"#;
    assert!(StateSnapshot::from_json(unknown_tag)
        .unwrap()
        .decode()
        .is_err());

    let missing_payload = r#"{"state_tag":"payment_selection"}"#;
    assert!(StateSnapshot::from_json(missing_payload)
        .unwrap()
        .decode()
        .is_err());
}
