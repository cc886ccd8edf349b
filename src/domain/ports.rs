use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::billing::{BillPage, BillView, LineItemView, NewLineItem, ReconciliationRecord};
use super::errors::{DomainError, TransportError};

/// Persistence boundary for bills and their line items. Pure storage: all
/// business rules (availability checks, price capture, compensation) live in
/// the coordinator, which is the only caller allowed to mutate line items.
pub trait LedgerStore: Send + Sync + 'static {
    fn create_bill(&self, customer_id: Uuid) -> Result<BillView, DomainError>;
    fn find_bill(&self, id: Uuid) -> Result<Option<BillView>, DomainError>;
    fn list_bills(&self, page: i64, limit: i64) -> Result<BillPage, DomainError>;
    /// Deletes a bill together with all of its line items.
    fn delete_bill(&self, id: Uuid) -> Result<(), DomainError>;

    fn items_for_bill(&self, bill_id: Uuid) -> Result<Vec<LineItemView>, DomainError>;
    fn find_item(&self, id: Uuid) -> Result<Option<LineItemView>, DomainError>;
    fn insert_item(&self, item: NewLineItem) -> Result<LineItemView, DomainError>;
    fn update_item_quantity(&self, id: Uuid, quantity: i32) -> Result<LineItemView, DomainError>;
    fn delete_item(&self, id: Uuid) -> Result<(), DomainError>;

    /// Appends a durable record of a failed remote stock adjustment for
    /// out-of-band replay.
    fn record_reconciliation(&self, record: ReconciliationRecord) -> Result<(), DomainError>;
}

/// Remote boundary to the service that owns the authoritative stock count.
///
/// Each call is one request/response round trip and may fail independently
/// with a `TransportError`. Insufficient stock is not an error: it is the
/// `Ok(false)` answer of `check_availability`.
pub trait InventoryAuthority: Send + Sync + 'static {
    fn check_availability(&self, product_id: Uuid, quantity: i32) -> Result<bool, TransportError>;
    fn current_price(&self, product_id: Uuid) -> Result<BigDecimal, TransportError>;
    /// Applies a signed delta to the remote stock count (negative debits,
    /// positive grants back) and returns the new count.
    fn adjust_quantity(&self, product_id: Uuid, delta: i32) -> Result<i32, TransportError>;
}
