use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::states::FlowStep;

/// Identifier of the order a shipping label is being created for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A postal address as entered by the merchant or the buyer.
///
/// An opaque value type as far as the engine is concerned: equality is
/// structural and no field-level validation happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub company: String,
    pub name: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
}

/// Which of the two label addresses a validation or editor call concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Origin,
    Destination,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Origin => write!(f, "origin"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

/// The accumulated payload threaded through every data-carrying state.
///
/// Instances are never mutated in place: transitions derive a new value via
/// [`with_origin_address`](Self::with_origin_address),
/// [`with_shipping_address`](Self::with_shipping_address) and
/// [`completing`](Self::completing). `completed_steps` only ever grows over
/// the lifetime of one workflow, and because the transition table only ever
/// completes the immediate successor step, the set stays a downward-closed
/// prefix of the [`FlowStep`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowData {
    pub origin_address: Address,
    pub shipping_address: Address,
    pub completed_steps: BTreeSet<FlowStep>,
}

impl WorkflowData {
    /// Fresh payload right after the order addresses are loaded.
    pub fn new(origin_address: Address, shipping_address: Address) -> Self {
        Self {
            origin_address,
            shipping_address,
            completed_steps: BTreeSet::from([FlowStep::OriginAddress]),
        }
    }

    /// Copy with the origin address replaced.
    pub fn with_origin_address(&self, address: Address) -> Self {
        Self {
            origin_address: address,
            ..self.clone()
        }
    }

    /// Copy with the shipping address replaced.
    pub fn with_shipping_address(&self, address: Address) -> Self {
        Self {
            shipping_address: address,
            ..self.clone()
        }
    }

    /// Copy with `step` added to the completed set (monotonic union).
    pub fn completing(&self, step: FlowStep) -> Self {
        let mut next = self.clone();
        next.completed_steps.insert(step);
        next
    }

    /// The step the wizard should show next: the smallest [`FlowStep`] not
    /// yet completed, or [`FlowStep::Done`] once everything is.
    pub fn current_step(&self) -> FlowStep {
        FlowStep::ALL
            .into_iter()
            .find(|step| !self.completed_steps.contains(step))
            .unwrap_or(FlowStep::Done)
    }

    /// Check if every step, including `Done`, has been completed.
    pub fn is_complete(&self) -> bool {
        self.completed_steps.contains(&FlowStep::Done)
    }
}
