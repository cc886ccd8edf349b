//! Line-item coordination against two independently-failing systems.
//!
//! Every add/update/remove of a billed line item pairs a ledger mutation
//! with inventory-authority calls, without a shared transaction. The
//! contract is best-effort compensation: failures before the ledger write
//! abort the request, failures after it degrade to a drift flag plus a
//! durable reconciliation record.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use crate::domain::billing::{LineItemView, NewLineItem, ReconciliationRecord, Reservation, StockState};
use crate::domain::errors::DomainError;
use crate::domain::ports::{InventoryAuthority, LedgerStore};

pub struct LineItemCoordinator<S, A> {
    ledger: S,
    authority: A,
    /// One lock per product id, held across the availability check, the
    /// ledger write, and the stock adjustment of an operation. Serializes
    /// concurrent operations on the same product within this process so
    /// two requests cannot both pass the check before either debits.
    product_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl<S: LedgerStore, A: InventoryAuthority> LineItemCoordinator<S, A> {
    pub fn new(ledger: S, authority: A) -> Self {
        Self {
            ledger,
            authority,
            product_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Adds a line item to a bill, reserving stock with the authority.
    ///
    /// The availability check and the price lookup are separate round trips
    /// and both must succeed before the ledger is touched. The insert is the
    /// durability point: once it returns, the item exists and is billed at
    /// the price captured here, regardless of whether the subsequent stock
    /// debit lands.
    pub fn add_line_item(
        &self,
        bill_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Reservation<LineItemView>, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }
        if self.ledger.find_bill(bill_id)?.is_none() {
            return Err(DomainError::BillNotFound);
        }

        let lock = self.product_lock(product_id);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        log::info!(
            "adding line item: bill={}, product={}, quantity={}",
            bill_id,
            product_id,
            quantity
        );

        let available = self
            .authority
            .check_availability(product_id, quantity)
            .map_err(DomainError::AvailabilityCheckFailed)?;
        if !available {
            return Err(DomainError::InsufficientStock {
                product_id,
                requested: quantity,
            });
        }

        let unit_price = self
            .authority
            .current_price(product_id)
            .map_err(DomainError::ProductLookupFailed)?;

        let item = self.ledger.insert_item(NewLineItem {
            bill_id,
            product_id,
            quantity,
            unit_price,
        })?;

        let stock = self.settle_stock(product_id, -quantity);
        Ok(Reservation { value: item, stock })
    }

    /// Changes an item's quantity, applying the signed difference to remote
    /// stock.
    ///
    /// Growing the item checks availability for the difference first; a
    /// business "not enough" answer aborts, but a transport failure of that
    /// check only logs a warning — the debit below is attempted either way,
    /// so a failed pre-check is not allowed to block the update. Shrinking
    /// needs no check. The remote adjustment is attempted before the local
    /// write commits.
    pub fn update_line_item_quantity(
        &self,
        item_id: Uuid,
        new_quantity: i32,
    ) -> Result<Reservation<LineItemView>, DomainError> {
        if new_quantity <= 0 {
            return Err(DomainError::InvalidQuantity(new_quantity));
        }
        let item = self
            .ledger
            .find_item(item_id)?
            .ok_or(DomainError::LineItemNotFound)?;

        let lock = self.product_lock(item.product_id);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let delta = new_quantity - item.quantity;

        if delta > 0 {
            match self.authority.check_availability(item.product_id, delta) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(DomainError::InsufficientStock {
                        product_id: item.product_id,
                        requested: delta,
                    });
                }
                Err(err) => {
                    log::warn!(
                        "availability check for product {} failed, proceeding: {}",
                        item.product_id,
                        err
                    );
                }
            }
        }

        // A negative delta here grants stock back to the authority.
        let stock = self.settle_stock(item.product_id, -delta);

        let updated = self.ledger.update_item_quantity(item_id, new_quantity)?;
        Ok(Reservation {
            value: updated,
            stock,
        })
    }

    /// Removes an item, returning its full quantity to remote stock.
    ///
    /// The deletion must succeed locally once the item was found; a failed
    /// stock return only produces drift.
    pub fn remove_line_item(&self, item_id: Uuid) -> Result<Reservation<()>, DomainError> {
        let item = self
            .ledger
            .find_item(item_id)?
            .ok_or(DomainError::LineItemNotFound)?;

        let lock = self.product_lock(item.product_id);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        log::info!(
            "removing line item {}: returning {} units of product {}",
            item_id,
            item.quantity,
            item.product_id
        );

        let stock = self.settle_stock(item.product_id, item.quantity);

        self.ledger.delete_item(item_id)?;
        Ok(Reservation { value: (), stock })
    }

    /// Applies a signed stock change after the ledger has committed. A zero
    /// delta is a no-op. Failures are logged and recorded for out-of-band
    /// reconciliation, never surfaced as errors.
    fn settle_stock(&self, product_id: Uuid, delta: i32) -> StockState {
        if delta == 0 {
            return StockState::Consistent;
        }
        match self.authority.adjust_quantity(product_id, delta) {
            Ok(_) => StockState::Consistent,
            Err(err) => {
                log::error!(
                    "stock adjustment for product {} (delta {}) failed: {}",
                    product_id,
                    delta,
                    err
                );
                let record = ReconciliationRecord {
                    product_id,
                    delta,
                    reason: err.to_string(),
                };
                if let Err(store_err) = self.ledger.record_reconciliation(record) {
                    log::error!(
                        "could not record reconciliation for product {}: {}",
                        product_id,
                        store_err
                    );
                }
                StockState::Drifted
            }
        }
    }

    fn product_lock(&self, product_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self
            .product_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(product_id).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use uuid::Uuid;

    use super::LineItemCoordinator;
    use crate::domain::billing::{
        BillPage, BillView, LineItemView, NewLineItem, ReconciliationRecord, StockState,
    };
    use crate::domain::errors::{DomainError, TransportError};
    use crate::domain::ports::{InventoryAuthority, LedgerStore};

    // ── In-memory fakes for the two ports ────────────────────────────────────

    #[derive(Default)]
    struct LedgerState {
        bills: HashMap<Uuid, Uuid>, // bill id → customer id
        items: HashMap<Uuid, LineItemView>,
        reconciliations: Vec<ReconciliationRecord>,
    }

    #[derive(Clone, Default)]
    struct InMemoryLedger {
        state: Arc<Mutex<LedgerState>>,
    }

    impl InMemoryLedger {
        fn item_count(&self, bill_id: Uuid) -> usize {
            let state = self.state.lock().unwrap();
            state
                .items
                .values()
                .filter(|i| i.bill_id == bill_id)
                .count()
        }

        fn reconciliations(&self) -> Vec<ReconciliationRecord> {
            self.state.lock().unwrap().reconciliations.clone()
        }
    }

    impl LedgerStore for InMemoryLedger {
        fn create_bill(&self, customer_id: Uuid) -> Result<BillView, DomainError> {
            let id = Uuid::new_v4();
            self.state.lock().unwrap().bills.insert(id, customer_id);
            Ok(BillView {
                id,
                customer_id,
                billing_date: Utc::now(),
                lines: vec![],
            })
        }

        fn find_bill(&self, id: Uuid) -> Result<Option<BillView>, DomainError> {
            let state = self.state.lock().unwrap();
            Ok(state.bills.get(&id).map(|&customer_id| BillView {
                id,
                customer_id,
                billing_date: Utc::now(),
                lines: state
                    .items
                    .values()
                    .filter(|i| i.bill_id == id)
                    .cloned()
                    .collect(),
            }))
        }

        fn list_bills(&self, _page: i64, _limit: i64) -> Result<BillPage, DomainError> {
            unimplemented!("not exercised by coordinator tests")
        }

        fn delete_bill(&self, id: Uuid) -> Result<(), DomainError> {
            let mut state = self.state.lock().unwrap();
            state.bills.remove(&id);
            state.items.retain(|_, i| i.bill_id != id);
            Ok(())
        }

        fn items_for_bill(&self, bill_id: Uuid) -> Result<Vec<LineItemView>, DomainError> {
            let state = self.state.lock().unwrap();
            Ok(state
                .items
                .values()
                .filter(|i| i.bill_id == bill_id)
                .cloned()
                .collect())
        }

        fn find_item(&self, id: Uuid) -> Result<Option<LineItemView>, DomainError> {
            Ok(self.state.lock().unwrap().items.get(&id).cloned())
        }

        fn insert_item(&self, item: NewLineItem) -> Result<LineItemView, DomainError> {
            let view = LineItemView {
                id: Uuid::new_v4(),
                bill_id: item.bill_id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            };
            self.state
                .lock()
                .unwrap()
                .items
                .insert(view.id, view.clone());
            Ok(view)
        }

        fn update_item_quantity(
            &self,
            id: Uuid,
            quantity: i32,
        ) -> Result<LineItemView, DomainError> {
            let mut state = self.state.lock().unwrap();
            let item = state
                .items
                .get_mut(&id)
                .ok_or(DomainError::LineItemNotFound)?;
            item.quantity = quantity;
            Ok(item.clone())
        }

        fn delete_item(&self, id: Uuid) -> Result<(), DomainError> {
            self.state
                .lock()
                .unwrap()
                .items
                .remove(&id)
                .map(|_| ())
                .ok_or(DomainError::LineItemNotFound)
        }

        fn record_reconciliation(&self, record: ReconciliationRecord) -> Result<(), DomainError> {
            self.state.lock().unwrap().reconciliations.push(record);
            Ok(())
        }
    }

    #[derive(Default)]
    struct AuthorityState {
        stock: HashMap<Uuid, i32>,
        price: HashMap<Uuid, BigDecimal>,
        fail_availability: bool,
        fail_price: bool,
        fail_adjust: bool,
        availability_calls: u32,
        adjust_calls: Vec<(Uuid, i32)>,
    }

    #[derive(Clone, Default)]
    struct ScriptedAuthority {
        state: Arc<Mutex<AuthorityState>>,
    }

    impl ScriptedAuthority {
        fn set_stock(&self, product_id: Uuid, stock: i32) {
            self.state.lock().unwrap().stock.insert(product_id, stock);
        }

        fn set_price(&self, product_id: Uuid, price: BigDecimal) {
            self.state.lock().unwrap().price.insert(product_id, price);
        }

        fn stock_of(&self, product_id: Uuid) -> i32 {
            self.state.lock().unwrap().stock[&product_id]
        }

        fn fail_availability(&self, fail: bool) {
            self.state.lock().unwrap().fail_availability = fail;
        }

        fn fail_price(&self, fail: bool) {
            self.state.lock().unwrap().fail_price = fail;
        }

        fn fail_adjust(&self, fail: bool) {
            self.state.lock().unwrap().fail_adjust = fail;
        }

        fn availability_calls(&self) -> u32 {
            self.state.lock().unwrap().availability_calls
        }

        fn adjust_calls(&self) -> Vec<(Uuid, i32)> {
            self.state.lock().unwrap().adjust_calls.clone()
        }
    }

    impl InventoryAuthority for ScriptedAuthority {
        fn check_availability(
            &self,
            product_id: Uuid,
            quantity: i32,
        ) -> Result<bool, TransportError> {
            let mut state = self.state.lock().unwrap();
            state.availability_calls += 1;
            if state.fail_availability {
                return Err(TransportError("connection refused".into()));
            }
            Ok(state.stock.get(&product_id).copied().unwrap_or(0) >= quantity)
        }

        fn current_price(&self, product_id: Uuid) -> Result<BigDecimal, TransportError> {
            let state = self.state.lock().unwrap();
            if state.fail_price {
                return Err(TransportError("connection refused".into()));
            }
            state
                .price
                .get(&product_id)
                .cloned()
                .ok_or_else(|| TransportError("unknown product".into()))
        }

        fn adjust_quantity(&self, product_id: Uuid, delta: i32) -> Result<i32, TransportError> {
            let mut state = self.state.lock().unwrap();
            state.adjust_calls.push((product_id, delta));
            if state.fail_adjust {
                return Err(TransportError("connection refused".into()));
            }
            let stock = state.stock.entry(product_id).or_insert(0);
            *stock += delta;
            Ok(*stock)
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    type Coordinator = LineItemCoordinator<InMemoryLedger, ScriptedAuthority>;

    fn setup(stock: i32, price: i64) -> (InMemoryLedger, ScriptedAuthority, Coordinator, Uuid, Uuid) {
        let ledger = InMemoryLedger::default();
        let authority = ScriptedAuthority::default();
        let coordinator = LineItemCoordinator::new(ledger.clone(), authority.clone());

        let bill = ledger.create_bill(Uuid::new_v4()).unwrap();
        let product_id = Uuid::new_v4();
        authority.set_stock(product_id, stock);
        authority.set_price(product_id, BigDecimal::from(price));

        (ledger, authority, coordinator, bill.id, product_id)
    }

    // ── add_line_item ────────────────────────────────────────────────────────

    #[test]
    fn add_commits_item_and_debits_stock() {
        let (ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);

        let reservation = coordinator.add_line_item(bill_id, product_id, 3).unwrap();

        assert_eq!(reservation.stock, StockState::Consistent);
        assert_eq!(reservation.value.bill_id, bill_id);
        assert_eq!(reservation.value.quantity, 3);
        assert_eq!(reservation.value.unit_price, BigDecimal::from(1800));
        assert_eq!(authority.stock_of(product_id), 7);
        assert_eq!(ledger.item_count(bill_id), 1);
    }

    #[test]
    fn add_captures_price_at_insertion_time() {
        let (_ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);

        let reservation = coordinator.add_line_item(bill_id, product_id, 1).unwrap();
        authority.set_price(product_id, BigDecimal::from(2500));

        // The captured price never follows later price changes.
        assert_eq!(reservation.value.unit_price, BigDecimal::from(1800));
    }

    #[test]
    fn add_rejects_non_positive_quantity() {
        let (_ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);

        for quantity in [0, -3] {
            let err = coordinator
                .add_line_item(bill_id, product_id, quantity)
                .unwrap_err();
            assert!(matches!(err, DomainError::InvalidQuantity(q) if q == quantity));
        }
        assert_eq!(authority.availability_calls(), 0);
    }

    #[test]
    fn add_to_unknown_bill_is_not_found() {
        let (_ledger, authority, coordinator, _bill_id, product_id) = setup(10, 1800);

        let err = coordinator
            .add_line_item(Uuid::new_v4(), product_id, 1)
            .unwrap_err();

        assert!(matches!(err, DomainError::BillNotFound));
        assert_eq!(authority.availability_calls(), 0);
    }

    #[test]
    fn add_with_insufficient_stock_leaves_ledger_unchanged() {
        let (ledger, authority, coordinator, bill_id, product_id) = setup(2, 1800);

        let err = coordinator
            .add_line_item(bill_id, product_id, 3)
            .unwrap_err();

        assert!(matches!(err, DomainError::InsufficientStock { requested: 3, .. }));
        assert_eq!(ledger.item_count(bill_id), 0);
        assert_eq!(authority.stock_of(product_id), 2);
    }

    #[test]
    fn add_aborts_when_availability_check_fails() {
        let (ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);
        authority.fail_availability(true);

        let err = coordinator
            .add_line_item(bill_id, product_id, 3)
            .unwrap_err();

        assert!(matches!(err, DomainError::AvailabilityCheckFailed(_)));
        assert_eq!(ledger.item_count(bill_id), 0);
        assert!(ledger.reconciliations().is_empty());
    }

    #[test]
    fn add_aborts_when_price_lookup_fails() {
        let (ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);
        authority.fail_price(true);

        let err = coordinator
            .add_line_item(bill_id, product_id, 3)
            .unwrap_err();

        assert!(matches!(err, DomainError::ProductLookupFailed(_)));
        assert_eq!(ledger.item_count(bill_id), 0);
        assert!(ledger.reconciliations().is_empty());
    }

    #[test]
    fn add_with_failed_debit_still_commits_and_records_drift() {
        let (ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);
        authority.fail_adjust(true);

        let reservation = coordinator.add_line_item(bill_id, product_id, 3).unwrap();

        assert_eq!(reservation.stock, StockState::Drifted);
        assert_eq!(ledger.item_count(bill_id), 1);

        let records = ledger.reconciliations();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product_id, product_id);
        assert_eq!(records[0].delta, -3);
    }

    // ── update_line_item_quantity ────────────────────────────────────────────

    #[test]
    fn update_zero_delta_skips_remote_calls() {
        let (_ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);
        let item = coordinator.add_line_item(bill_id, product_id, 4).unwrap().value;

        let first = coordinator.update_line_item_quantity(item.id, 4).unwrap();
        let second = coordinator.update_line_item_quantity(item.id, 4).unwrap();

        assert_eq!(first.value.quantity, 4);
        assert_eq!(second.value.quantity, 4);
        assert_eq!(second.stock, StockState::Consistent);
        // One availability check and one debit from the add, nothing since.
        assert_eq!(authority.availability_calls(), 1);
        assert_eq!(authority.adjust_calls().len(), 1);
        assert_eq!(authority.stock_of(product_id), 6);
    }

    #[test]
    fn update_growth_debits_the_difference() {
        let (_ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);
        let item = coordinator.add_line_item(bill_id, product_id, 3).unwrap().value;

        let updated = coordinator.update_line_item_quantity(item.id, 5).unwrap();

        assert_eq!(updated.value.quantity, 5);
        assert_eq!(updated.stock, StockState::Consistent);
        assert_eq!(authority.stock_of(product_id), 5);
        assert_eq!(authority.adjust_calls().last(), Some(&(product_id, -2)));
    }

    #[test]
    fn update_growth_with_insufficient_stock_aborts() {
        let (ledger, authority, coordinator, bill_id, product_id) = setup(5, 1800);
        let item = coordinator.add_line_item(bill_id, product_id, 4).unwrap().value;
        // One unit left; growing by three must be rejected.
        let err = coordinator
            .update_line_item_quantity(item.id, 7)
            .unwrap_err();

        assert!(matches!(err, DomainError::InsufficientStock { requested: 3, .. }));
        assert_eq!(ledger.find_item(item.id).unwrap().unwrap().quantity, 4);
        assert_eq!(authority.stock_of(product_id), 1);
    }

    #[test]
    fn update_growth_proceeds_when_availability_check_fails() {
        let (_ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);
        let item = coordinator.add_line_item(bill_id, product_id, 3).unwrap().value;
        authority.fail_availability(true);

        let updated = coordinator.update_line_item_quantity(item.id, 5).unwrap();

        // The unverified pre-check is tolerated; the debit still lands.
        assert_eq!(updated.value.quantity, 5);
        assert_eq!(updated.stock, StockState::Consistent);
        assert_eq!(authority.stock_of(product_id), 5);
    }

    #[test]
    fn update_shrink_returns_stock_without_availability_check() {
        let (_ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);
        let item = coordinator.add_line_item(bill_id, product_id, 5).unwrap().value;
        let checks_after_add = authority.availability_calls();

        let updated = coordinator.update_line_item_quantity(item.id, 1).unwrap();

        assert_eq!(updated.value.quantity, 1);
        assert_eq!(authority.availability_calls(), checks_after_add);
        assert_eq!(authority.adjust_calls().last(), Some(&(product_id, 4)));
        assert_eq!(authority.stock_of(product_id), 9);
    }

    #[test]
    fn update_with_failed_adjustment_persists_and_records_drift() {
        let (ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);
        let item = coordinator.add_line_item(bill_id, product_id, 3).unwrap().value;
        authority.fail_adjust(true);

        let updated = coordinator.update_line_item_quantity(item.id, 5).unwrap();

        assert_eq!(updated.value.quantity, 5);
        assert_eq!(updated.stock, StockState::Drifted);
        assert_eq!(ledger.find_item(item.id).unwrap().unwrap().quantity, 5);

        let records = ledger.reconciliations();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].delta, -2);
    }

    #[test]
    fn update_rejects_non_positive_quantity() {
        let (_ledger, _authority, coordinator, bill_id, product_id) = setup(10, 1800);
        let item = coordinator.add_line_item(bill_id, product_id, 3).unwrap().value;

        let err = coordinator
            .update_line_item_quantity(item.id, 0)
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidQuantity(0)));
    }

    #[test]
    fn update_unknown_item_is_not_found() {
        let (_ledger, _authority, coordinator, _bill_id, _product_id) = setup(10, 1800);

        let err = coordinator
            .update_line_item_quantity(Uuid::new_v4(), 2)
            .unwrap_err();

        assert!(matches!(err, DomainError::LineItemNotFound));
    }

    // ── remove_line_item ─────────────────────────────────────────────────────

    #[test]
    fn remove_returns_stock_and_deletes_item() {
        let (ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);
        let item = coordinator.add_line_item(bill_id, product_id, 3).unwrap().value;

        let outcome = coordinator.remove_line_item(item.id).unwrap();

        assert_eq!(outcome.stock, StockState::Consistent);
        assert_eq!(ledger.item_count(bill_id), 0);
        assert_eq!(authority.stock_of(product_id), 10);
    }

    #[test]
    fn remove_deletes_item_even_when_stock_return_fails() {
        let (ledger, authority, coordinator, bill_id, product_id) = setup(10, 1800);
        let item = coordinator.add_line_item(bill_id, product_id, 3).unwrap().value;
        authority.fail_adjust(true);

        let outcome = coordinator.remove_line_item(item.id).unwrap();

        assert_eq!(outcome.stock, StockState::Drifted);
        assert_eq!(ledger.item_count(bill_id), 0);

        let records = ledger.reconciliations();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].delta, 3);
    }

    #[test]
    fn remove_unknown_item_is_not_found() {
        let (_ledger, _authority, coordinator, _bill_id, _product_id) = setup(10, 1800);

        let err = coordinator.remove_line_item(Uuid::new_v4()).unwrap_err();

        assert!(matches!(err, DomainError::LineItemNotFound));
    }

    // ── Full lifecycle ───────────────────────────────────────────────────────

    #[test]
    fn full_lifecycle_keeps_authority_stock_in_sync() {
        let (ledger, authority, coordinator, bill_id, product_id) = setup(5, 1000);

        let item = coordinator.add_line_item(bill_id, product_id, 3).unwrap().value;
        assert_eq!(item.quantity, 3);
        assert_eq!(authority.stock_of(product_id), 2);

        // Growing to 5 needs exactly the remaining two units.
        let grown = coordinator.update_line_item_quantity(item.id, 5).unwrap();
        assert_eq!(grown.value.quantity, 5);
        assert_eq!(authority.stock_of(product_id), 0);

        let shrunk = coordinator.update_line_item_quantity(item.id, 1).unwrap();
        assert_eq!(shrunk.value.quantity, 1);
        assert_eq!(authority.stock_of(product_id), 4);

        coordinator.remove_line_item(item.id).unwrap();
        assert_eq!(authority.stock_of(product_id), 5);
        assert_eq!(ledger.item_count(bill_id), 0);
        assert!(ledger.reconciliations().is_empty());
    }
}
