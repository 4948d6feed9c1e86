// Side-effect publishing for workflow sessions
//
// Each state machine instance owns exactly one publisher; nothing here is
// a process-wide singleton.

pub mod publisher;

pub use publisher::{EmittedEffect, SideEffectPublisher};
