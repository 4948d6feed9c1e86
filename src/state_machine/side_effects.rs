use serde::{Deserialize, Serialize};
use std::fmt;

use super::data::{Address, AddressKind, OrderId, WorkflowData};

/// Failures the driver is asked to surface to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowError {
    /// The order's addresses could not be loaded
    DataLoading,
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataLoading => write!(f, "data_loading"),
        }
    }
}

/// Instructions to the workflow driver, emitted alongside each transition.
///
/// Side effects are pure descriptions of work the driver must perform
/// outside the engine (I/O, navigation, rendering); the engine itself
/// never performs any of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SideEffect {
    /// Nothing to do; also the primed value of a fresh or restored channel
    NoOp,
    /// Fetch the order's origin and destination addresses
    LoadData(OrderId),
    /// Surface a workflow failure to the user
    ShowError(WorkflowError),
    /// Re-render the wizard from the given data
    UpdateViewState(WorkflowData),

    /// Run the external validator against the given address
    ValidateAddress { address: Address, kind: AddressKind },
    /// Offer the validator's corrected candidate next to what was entered
    ShowAddressSuggestion {
        entered: Address,
        suggested: Address,
        kind: AddressKind,
    },
    /// Open the manual address editor
    OpenAddressEditor { address: Address, kind: AddressKind },

    ShowPackageOptions,
    ShowCustomsForm,
    ShowCarrierOptions,
    ShowPaymentDetails,
}

impl SideEffect {
    /// Get a string representation of the effect type for logging
    pub fn effect_type(&self) -> &'static str {
        match self {
            Self::NoOp => "no_op",
            Self::LoadData(_) => "load_data",
            Self::ShowError(_) => "show_error",
            Self::UpdateViewState(_) => "update_view_state",
            Self::ValidateAddress { .. } => "validate_address",
            Self::ShowAddressSuggestion { .. } => "show_address_suggestion",
            Self::OpenAddressEditor { .. } => "open_address_editor",
            Self::ShowPackageOptions => "show_package_options",
            Self::ShowCustomsForm => "show_customs_form",
            Self::ShowCarrierOptions => "show_carrier_options",
            Self::ShowPaymentDetails => "show_payment_details",
        }
    }
}

impl Default for SideEffect {
    fn default() -> Self {
        Self::NoOp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_serde_round_trip() {
        let effect = SideEffect::ValidateAddress {
            address: Address::default(),
            kind: AddressKind::Origin,
        };
        let json = serde_json::to_string(&effect).unwrap();
        let parsed: SideEffect = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, effect);
    }

    #[test]
    fn test_effect_type_labels() {
        assert_eq!(SideEffect::NoOp.effect_type(), "no_op");
        assert_eq!(
            SideEffect::LoadData(OrderId::from("order-1")).effect_type(),
            "load_data"
        );
        assert_eq!(
            SideEffect::ShowError(WorkflowError::DataLoading).effect_type(),
            "show_error"
        );
    }
}
