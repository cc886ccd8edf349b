use thiserror::Error;
use uuid::Uuid;

/// Failures of one coordinated line-item operation.
///
/// Everything here aborts the request *before* any ledger write. Remote
/// failures discovered after the ledger has committed never surface as
/// errors; they degrade to a drift flag on the successful result.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Bill not found")]
    BillNotFound,

    #[error("Line item not found")]
    LineItemNotFound,

    #[error("Quantity must be a positive integer, got {0}")]
    InvalidQuantity(i32),

    #[error("Insufficient stock for product {product_id}: requested {requested}")]
    InsufficientStock { product_id: Uuid, requested: i32 },

    #[error("Could not verify product availability: {0}")]
    AvailabilityCheckFailed(TransportError),

    #[error("Could not fetch product price: {0}")]
    ProductLookupFailed(TransportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A remote call to the inventory authority failed at the transport level
/// (connect, timeout, non-2xx, undecodable body). Deliberately distinct from
/// a business-level "insufficient stock" answer, which is a successful call
/// returning `false`.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);
