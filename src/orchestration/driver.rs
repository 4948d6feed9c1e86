use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::collaborators::{AddressValidator, OrderDataLoader, ValidationOutcome};
use crate::state_machine::{
    FlowEvent, FlowState, LabelStateMachine, OrderId, SideEffect, SnapshotError, SnapshotStore,
    StateMachineResult, StateSnapshot, Transition,
};

/// The engine's directly coupled consumer: owns one [`LabelStateMachine`]
/// and interprets its side effects.
///
/// Data-loading and validation effects are executed against the injected
/// collaborators and their outcomes fed straight back into the machine;
/// everything else is a presentation concern and is forwarded on an
/// unbounded channel for the host UI to render. One driver per wizard
/// session; nothing is shared across sessions.
pub struct WorkflowDriver {
    session_id: Uuid,
    machine: LabelStateMachine,
    loader: Arc<dyn OrderDataLoader>,
    validator: Arc<dyn AddressValidator>,
    snapshot_store: Option<Arc<dyn SnapshotStore>>,
    presentation_tx: mpsc::UnboundedSender<SideEffect>,
    presentation_rx: Option<mpsc::UnboundedReceiver<SideEffect>>,
}

impl WorkflowDriver {
    /// Create a driver for a fresh wizard session.
    pub fn new(loader: Arc<dyn OrderDataLoader>, validator: Arc<dyn AddressValidator>) -> Self {
        Self::with_machine(LabelStateMachine::new(), loader, validator)
    }

    /// Recreate a driver from a persisted snapshot.
    ///
    /// No collaborator call is made and no effect is forwarded: the session
    /// picks up parked exactly where the snapshot left it.
    pub fn resume(
        snapshot: &StateSnapshot,
        loader: Arc<dyn OrderDataLoader>,
        validator: Arc<dyn AddressValidator>,
    ) -> Result<Self, SnapshotError> {
        Ok(Self::with_machine(
            LabelStateMachine::restore(snapshot)?,
            loader,
            validator,
        ))
    }

    fn with_machine(
        machine: LabelStateMachine,
        loader: Arc<dyn OrderDataLoader>,
        validator: Arc<dyn AddressValidator>,
    ) -> Self {
        let (presentation_tx, presentation_rx) = mpsc::unbounded_channel();
        Self {
            session_id: Uuid::new_v4(),
            machine,
            loader,
            validator,
            snapshot_store: None,
            presentation_tx,
            presentation_rx: Some(presentation_rx),
        }
    }

    /// Persist a snapshot to `store` after every accepted event, keyed by
    /// this session's id.
    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshot_store = Some(store);
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> &FlowState {
        self.machine.current_state()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.machine.snapshot()
    }

    /// Take the presentation-effect receiver. Yields `Some` exactly once.
    pub fn presentation_effects(&mut self) -> Option<mpsc::UnboundedReceiver<SideEffect>> {
        self.presentation_rx.take()
    }

    /// Start the wizard for the given order and run the effect loop until
    /// the machine parks waiting for external input.
    pub async fn start(&mut self, order_id: OrderId) -> StateMachineResult<()> {
        let transition = self.apply(FlowEvent::FlowStarted(order_id))?;
        self.run_effects(transition).await
    }

    /// Feed a user- or system-raised event into the machine, then run the
    /// effect loop until it parks again.
    ///
    /// An event the current state has no handler for is rejected by the
    /// machine without touching its state; the error is logged here and
    /// surfaced for the host to decide what to do with.
    pub async fn handle_event(&mut self, event: FlowEvent) -> StateMachineResult<()> {
        let transition = self.apply(event)?;
        self.run_effects(transition).await
    }

    /// Execute effects until one needs external input.
    ///
    /// The loop fully processes each transition's effect before feeding the
    /// follow-up event, per the latest-wins contract of the effect channel.
    async fn run_effects(&mut self, mut transition: Transition) -> StateMachineResult<()> {
        loop {
            match transition.side_effect {
                SideEffect::LoadData(order_id) => {
                    let event = match self.loader.load_order_addresses(&order_id).await {
                        Ok(addresses) => FlowEvent::DataLoaded {
                            origin: addresses.origin,
                            destination: addresses.destination,
                        },
                        Err(err) => {
                            tracing::error!(
                                session_id = %self.session_id,
                                order_id = %order_id,
                                error = %err,
                                "order address loading failed"
                            );
                            FlowEvent::DataLoadingFailed
                        }
                    };
                    transition = self.apply(event)?;
                }
                SideEffect::ValidateAddress { address, kind } => {
                    let event = match self.validator.validate_address(&address, kind).await {
                        ValidationOutcome::Valid => FlowEvent::AddressValidated(address),
                        ValidationOutcome::Invalid { suggested } => {
                            FlowEvent::AddressInvalid { suggested }
                        }
                        ValidationOutcome::NotRecognized => FlowEvent::AddressNotRecognized,
                        ValidationOutcome::Error { message } => {
                            // Policy: a failing validation service routes the
                            // user into the manual editor, where "use as-is"
                            // still allows progress.
                            tracing::warn!(
                                session_id = %self.session_id,
                                kind = %kind,
                                error = %message,
                                "address validation errored; treating address as not recognized"
                            );
                            FlowEvent::AddressNotRecognized
                        }
                    };
                    transition = self.apply(event)?;
                }
                effect => {
                    // Presentation concern: hand it to the host and park.
                    if self.presentation_tx.send(effect).is_err() {
                        tracing::debug!(
                            session_id = %self.session_id,
                            "presentation receiver dropped; effect discarded"
                        );
                    }
                    return Ok(());
                }
            }
        }
    }

    fn apply(&mut self, event: FlowEvent) -> StateMachineResult<Transition> {
        let transition = self.machine.handle_event(event).map_err(|err| {
            tracing::warn!(session_id = %self.session_id, error = %err, "event rejected");
            err
        })?;
        if let Some(store) = &self.snapshot_store {
            store.save(self.session_id, self.machine.snapshot());
        }
        Ok(transition)
    }
}
