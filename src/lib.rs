#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Labelflow Core
//!
//! Finite-state workflow core driving the shipping-label creation wizard:
//! origin address validation → shipping address validation → package
//! selection → customs declaration → carrier selection → payment selection
//! → completion.
//!
//! ## Architecture
//!
//! The engine is a synchronous state machine that describes all outside
//! work as side effects. A driver observes each transition's side effect,
//! performs the asynchronous call it describes (loading order data,
//! validating an address, rendering a screen), and feeds the outcome back
//! as the next event:
//!
//! ```text
//! driver → event → state machine → (state, side effect) → driver → …
//! ```
//!
//! ## Module Organization
//!
//! - [`state_machine`] - States, events, side effects, transition table, snapshots
//! - [`orchestration`] - The workflow driver and collaborator traits
//! - [`events`] - Single-slot side-effect channel
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`telemetry`] - Tracing subscriber bootstrap
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use labelflow_core::{OrderId, WorkflowDriver};
//! # use labelflow_core::{AddressValidator, OrderDataLoader};
//!
//! # async fn example(
//! #     loader: Arc<dyn OrderDataLoader>,
//! #     validator: Arc<dyn AddressValidator>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let mut driver = WorkflowDriver::new(loader, validator);
//! let mut effects = driver.presentation_effects().expect("first take");
//!
//! driver.start(OrderId::from("order-1")).await?;
//! while let Some(effect) = effects.recv().await {
//!     // render the wizard, then feed the next user event
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Sessions survive process death through [`LabelStateMachine::snapshot`]
//! and [`WorkflowDriver::resume`]; restoring never replays side effects.

pub mod config;
pub mod error;
pub mod events;
pub mod orchestration;
pub mod state_machine;
pub mod telemetry;

pub use config::{ConfigManager, Environment, LabelflowConfig, TelemetryConfig};
pub use error::{LabelflowError, Result};
pub use events::{EmittedEffect, SideEffectPublisher};
pub use orchestration::{
    AddressValidator, DataLoadingError, OrderAddresses, OrderDataLoader, ValidationOutcome,
    WorkflowDriver,
};
pub use state_machine::{
    Address, AddressKind, FlowEvent, FlowState, FlowStep, InMemorySnapshotStore,
    LabelStateMachine, OrderId, SideEffect, SnapshotError, SnapshotStore, StateMachineError,
    StateMachineResult, StateSnapshot, Transition, WorkflowData, WorkflowError,
};
