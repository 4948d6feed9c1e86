use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::state_machine::SideEffect;

/// A side effect together with the instant it was emitted.
#[derive(Debug, Clone)]
pub struct EmittedEffect {
    pub effect: SideEffect,
    pub emitted_at: DateTime<Utc>,
}

impl EmittedEffect {
    fn now(effect: SideEffect) -> Self {
        Self {
            effect,
            emitted_at: Utc::now(),
        }
    }
}

/// Single-slot, latest-value publish point for workflow side effects.
///
/// Known limitation, by contract: there is no delivery guarantee beyond
/// "latest observed wins". If the observer is not draining the channel
/// between two transitions, the earlier effect is silently replaced.
/// Callers must fully process one effect before feeding the next event.
#[derive(Debug)]
pub struct SideEffectPublisher {
    sender: watch::Sender<EmittedEffect>,
}

impl SideEffectPublisher {
    /// Create a publisher primed with [`SideEffect::NoOp`].
    pub fn new() -> Self {
        let (sender, _) = watch::channel(EmittedEffect::now(SideEffect::NoOp));
        Self { sender }
    }

    /// Publish an effect, replacing whatever the slot held before.
    pub fn emit(&self, effect: SideEffect) {
        self.sender.send_replace(EmittedEffect::now(effect));
    }

    /// The effect currently held in the slot.
    pub fn latest(&self) -> EmittedEffect {
        self.sender.borrow().clone()
    }

    /// Subscribe to the slot; the receiver always observes the latest value.
    pub fn subscribe(&self) -> watch::Receiver<EmittedEffect> {
        self.sender.subscribe()
    }
}

impl Default for SideEffectPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::OrderId;

    #[test]
    fn test_fresh_publisher_holds_no_op() {
        let publisher = SideEffectPublisher::new();
        assert_eq!(publisher.latest().effect, SideEffect::NoOp);
    }

    #[test]
    fn test_emit_replaces_slot() {
        let publisher = SideEffectPublisher::new();
        publisher.emit(SideEffect::LoadData(OrderId::from("order-1")));
        publisher.emit(SideEffect::ShowPackageOptions);

        // latest-wins: the first effect is gone
        assert_eq!(publisher.latest().effect, SideEffect::ShowPackageOptions);
    }

    #[test]
    fn test_subscriber_observes_latest_only() {
        tokio_test::block_on(async {
            let publisher = SideEffectPublisher::new();
            let mut receiver = publisher.subscribe();

            publisher.emit(SideEffect::ShowCustomsForm);
            publisher.emit(SideEffect::ShowCarrierOptions);

            receiver.changed().await.unwrap();
            assert_eq!(
                receiver.borrow_and_update().effect,
                SideEffect::ShowCarrierOptions
            );
        });
    }
}
