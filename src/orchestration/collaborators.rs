use async_trait::async_trait;
use thiserror::Error;

use crate::state_machine::{Address, AddressKind, OrderId};

/// The pair of addresses a shipping label needs, as stored on the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAddresses {
    pub origin: Address,
    pub destination: Address,
}

/// What the external validation service said about an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The address checks out (possibly normalized by the service)
    Valid,
    /// The address does not check out, but a corrected candidate exists
    Invalid { suggested: Address },
    /// The service could not match the address at all
    NotRecognized,
    /// The service itself failed
    Error { message: String },
}

/// Why the order's addresses could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataLoadingError {
    #[error("order `{0}` not found")]
    OrderNotFound(OrderId),

    #[error("order data backend failed: {0}")]
    Backend(String),
}

/// Fetches the origin and destination addresses stored on an order.
///
/// Retry policy belongs to the implementation; the driver takes a single
/// answer and feeds it into the workflow.
#[async_trait]
pub trait OrderDataLoader: Send + Sync {
    async fn load_order_addresses(
        &self,
        order_id: &OrderId,
    ) -> Result<OrderAddresses, DataLoadingError>;
}

/// Validates an address against the external validation service.
#[async_trait]
pub trait AddressValidator: Send + Sync {
    async fn validate_address(&self, address: &Address, kind: AddressKind) -> ValidationOutcome;
}
