use serde::{Deserialize, Serialize};
use std::fmt;

use super::data::WorkflowData;

/// The ordered milestones of the shipping-label wizard.
///
/// The declaration order is the flow order; `Ord` is derived from it and is
/// what the current-step derivation in [`WorkflowData`] relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    /// Origin address confirmed
    OriginAddress,
    /// Shipping (destination) address confirmed
    ShippingAddress,
    /// Packages picked
    Packaging,
    /// Customs declaration filled out
    Customs,
    /// Carrier and rate picked
    Carrier,
    /// Payment method picked
    Payment,
    /// Workflow finished
    Done,
}

impl FlowStep {
    /// All steps in flow order.
    pub const ALL: [FlowStep; 7] = [
        Self::OriginAddress,
        Self::ShippingAddress,
        Self::Packaging,
        Self::Customs,
        Self::Carrier,
        Self::Payment,
        Self::Done,
    ];
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OriginAddress => write!(f, "origin_address"),
            Self::ShippingAddress => write!(f, "shipping_address"),
            Self::Packaging => write!(f, "packaging"),
            Self::Customs => write!(f, "customs"),
            Self::Carrier => write!(f, "carrier"),
            Self::Payment => write!(f, "payment"),
            Self::Done => write!(f, "done"),
        }
    }
}

impl std::str::FromStr for FlowStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "origin_address" => Ok(Self::OriginAddress),
            "shipping_address" => Ok(Self::ShippingAddress),
            "packaging" => Ok(Self::Packaging),
            "customs" => Ok(Self::Customs),
            "carrier" => Ok(Self::Carrier),
            "payment" => Ok(Self::Payment),
            "done" => Ok(Self::Done),
            _ => Err(format!("Invalid flow step: {s}")),
        }
    }
}

/// Workflow state definitions for the shipping-label creation wizard.
///
/// `Idle`, `DataLoading` and `DataLoadingFailure` carry no payload; every
/// other state threads the accumulated [`WorkflowData`] through the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// Initial state before the flow is started
    Idle,
    /// Order addresses are being fetched
    DataLoading,
    /// Order addresses could not be fetched; terminal within a session
    DataLoadingFailure,
    /// Parked between steps, waiting for user input
    WaitingForInput(WorkflowData),

    OriginAddressValidation(WorkflowData),
    OriginAddressSuggestion(WorkflowData),
    OriginAddressEditing(WorkflowData),

    ShippingAddressValidation(WorkflowData),
    ShippingAddressSuggestion(WorkflowData),
    ShippingAddressEditing(WorkflowData),

    PackageSelection(WorkflowData),
    CustomsDeclaration(WorkflowData),
    ShippingCarrierSelection(WorkflowData),
    PaymentSelection(WorkflowData),
}

impl FlowState {
    /// Stable snake_case discriminant, also used as the persisted state tag.
    pub fn state_tag(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DataLoading => "data_loading",
            Self::DataLoadingFailure => "data_loading_failure",
            Self::WaitingForInput(_) => "waiting_for_input",
            Self::OriginAddressValidation(_) => "origin_address_validation",
            Self::OriginAddressSuggestion(_) => "origin_address_suggestion",
            Self::OriginAddressEditing(_) => "origin_address_editing",
            Self::ShippingAddressValidation(_) => "shipping_address_validation",
            Self::ShippingAddressSuggestion(_) => "shipping_address_suggestion",
            Self::ShippingAddressEditing(_) => "shipping_address_editing",
            Self::PackageSelection(_) => "package_selection",
            Self::CustomsDeclaration(_) => "customs_declaration",
            Self::ShippingCarrierSelection(_) => "shipping_carrier_selection",
            Self::PaymentSelection(_) => "payment_selection",
        }
    }

    /// The workflow data carried by this state, if any.
    pub fn workflow_data(&self) -> Option<&WorkflowData> {
        match self {
            Self::Idle | Self::DataLoading | Self::DataLoadingFailure => None,
            Self::WaitingForInput(data)
            | Self::OriginAddressValidation(data)
            | Self::OriginAddressSuggestion(data)
            | Self::OriginAddressEditing(data)
            | Self::ShippingAddressValidation(data)
            | Self::ShippingAddressSuggestion(data)
            | Self::ShippingAddressEditing(data)
            | Self::PackageSelection(data)
            | Self::CustomsDeclaration(data)
            | Self::ShippingCarrierSelection(data)
            | Self::PaymentSelection(data) => Some(data),
        }
    }

    /// Check if this is a terminal state for the session.
    ///
    /// Only `DataLoadingFailure` qualifies; the sole way out is restarting
    /// the whole workflow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::DataLoadingFailure)
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state_tag())
    }
}

/// Default state for a fresh wizard session
impl Default for FlowState {
    fn default() -> Self {
        Self::Idle
    }
}
