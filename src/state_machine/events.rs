use serde::{Deserialize, Serialize};

use super::data::{Address, OrderId};

/// Facts raised by the workflow driver that can trigger state transitions.
///
/// Events carry what happened, never what should happen next; the transition
/// table in [`machine`](super::machine) owns the routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FlowEvent {
    /// A wizard session was started for the given order
    FlowStarted(OrderId),
    /// The order's addresses were fetched
    DataLoaded {
        origin: Address,
        destination: Address,
    },
    /// The order's addresses could not be fetched
    DataLoadingFailed,

    /// The validator accepted the address (possibly normalized)
    AddressValidated(Address),
    /// The validator rejected the address but produced a corrected candidate
    AddressInvalid { suggested: Address },
    /// The validator could not match the address at all
    AddressNotRecognized,
    /// The user chose to keep the entered address without validation
    AddressUsedAsIs(Address),
    /// The user finished editing; the result must be re-validated
    AddressEditFinished(Address),
    /// The user backed out of the editor
    AddressEditCanceled,
    /// The user accepted the validator's suggested address
    SuggestedAddressSelected(Address),

    OriginAddressValidationStarted,
    EditOriginAddressRequested,

    ShippingAddressValidationStarted,
    EditShippingAddressRequested,

    PackageSelectionStarted,
    EditPackagingRequested,
    /// Package picking finished. The payload identifies what was picked;
    /// the engine records only that the sub-flow is done.
    PackagesSelected { package_count: u32 },

    CustomsDeclarationStarted,
    EditCustomsRequested,
    /// Customs declaration finished for the given number of line items.
    CustomsFormFilledOut { items_declared: u32 },

    ShippingCarrierSelectionStarted,
    EditShippingCarrierRequested,
    /// A carrier rate was picked.
    ShippingCarrierSelected { carrier_id: String },

    PaymentSelectionStarted,
    EditPaymentRequested,
    /// A payment method was picked.
    PaymentSelected { payment_method_id: String },
}

impl FlowEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::FlowStarted(_) => "flow_started",
            Self::DataLoaded { .. } => "data_loaded",
            Self::DataLoadingFailed => "data_loading_failed",
            Self::AddressValidated(_) => "address_validated",
            Self::AddressInvalid { .. } => "address_invalid",
            Self::AddressNotRecognized => "address_not_recognized",
            Self::AddressUsedAsIs(_) => "address_used_as_is",
            Self::AddressEditFinished(_) => "address_edit_finished",
            Self::AddressEditCanceled => "address_edit_canceled",
            Self::SuggestedAddressSelected(_) => "suggested_address_selected",
            Self::OriginAddressValidationStarted => "origin_address_validation_started",
            Self::EditOriginAddressRequested => "edit_origin_address_requested",
            Self::ShippingAddressValidationStarted => "shipping_address_validation_started",
            Self::EditShippingAddressRequested => "edit_shipping_address_requested",
            Self::PackageSelectionStarted => "package_selection_started",
            Self::EditPackagingRequested => "edit_packaging_requested",
            Self::PackagesSelected { .. } => "packages_selected",
            Self::CustomsDeclarationStarted => "customs_declaration_started",
            Self::EditCustomsRequested => "edit_customs_requested",
            Self::CustomsFormFilledOut { .. } => "customs_form_filled_out",
            Self::ShippingCarrierSelectionStarted => "shipping_carrier_selection_started",
            Self::EditShippingCarrierRequested => "edit_shipping_carrier_requested",
            Self::ShippingCarrierSelected { .. } => "shipping_carrier_selected",
            Self::PaymentSelectionStarted => "payment_selection_started",
            Self::EditPaymentRequested => "edit_payment_requested",
            Self::PaymentSelected { .. } => "payment_selected",
        }
    }
}
