use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct LineItemView {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub billing_date: DateTime<Utc>,
    pub lines: Vec<LineItemView>,
}

/// Input for the ledger's single-insert durability point. The unit price is
/// captured by the coordinator at insertion time and never re-fetched.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub bill_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct BillPage {
    pub items: Vec<BillView>,
    pub total: i64,
}

/// Durable record of a remote stock adjustment that failed after the ledger
/// had already committed. `delta` is the signed change that was intended, so
/// an out-of-band reconciler can replay it against the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationRecord {
    pub product_id: Uuid,
    pub delta: i32,
    pub reason: String,
}

/// Whether the remote stock count reflects the ledger after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockState {
    Consistent,
    /// The ledger committed but the remote adjustment failed; a
    /// reconciliation record has been queued.
    Drifted,
}

/// Result of one coordinated line-item operation. The ledger mutation in
/// `value` is final either way; `stock` reports whether the paired
/// inventory adjustment landed.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation<T> {
    pub value: T,
    pub stock: StockState,
}

impl<T> Reservation<T> {
    pub fn drifted(&self) -> bool {
        self.stock == StockState::Drifted
    }
}
