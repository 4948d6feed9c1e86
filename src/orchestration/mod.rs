// Workflow orchestration: the driver loop around the state machine core
//
// The driver executes data-loading and validation side effects against the
// injected collaborator traits and forwards presentation effects to the
// host. Rendering, retry policy and storage all live behind those seams.

pub mod collaborators;
pub mod driver;

pub use collaborators::{
    AddressValidator, DataLoadingError, OrderAddresses, OrderDataLoader, ValidationOutcome,
};
pub use driver::WorkflowDriver;
