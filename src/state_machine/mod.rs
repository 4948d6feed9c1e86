// State machine module for the shipping-label creation workflow
//
// One machine instance per wizard session. The machine applies driver-raised
// events against an explicit transition table, threads the accumulated
// workflow data through its states, and describes all outside work as side
// effects for the driver to execute.

pub mod data;
pub mod errors;
pub mod events;
pub mod machine;
pub mod persistence;
pub mod side_effects;
pub mod states;

// Re-export main types for convenient access
pub use data::{Address, AddressKind, OrderId, WorkflowData};
pub use errors::{SnapshotError, StateMachineError, StateMachineResult};
pub use events::FlowEvent;
pub use machine::{LabelStateMachine, Transition};
pub use persistence::{InMemorySnapshotStore, SnapshotStore, StateSnapshot};
pub use side_effects::{SideEffect, WorkflowError};
pub use states::{FlowState, FlowStep};
