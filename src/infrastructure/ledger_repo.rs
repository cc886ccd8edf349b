use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::billing::{BillPage, BillView, LineItemView, NewLineItem, ReconciliationRecord};
use crate::domain::errors::DomainError;
use crate::domain::ports::LedgerStore;
use crate::schema::{bills, inventory_reconciliation, line_items};

use super::models::{
    BillRow, LineItemRow, NewBillRow, NewLineItemRow, NewReconciliationRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<LineItemRow> for LineItemView {
    fn from(row: LineItemRow) -> Self {
        LineItemView {
            id: row.id,
            bill_id: row.bill_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

// ── Ledger store ─────────────────────────────────────────────────────────────

/// PostgreSQL-backed bill/line-item persistence. No business rules: ordering
/// decisions (write only after remote checks, delete regardless of remote
/// outcome) belong to the coordinator calling in.
#[derive(Clone)]
pub struct DieselLedgerStore {
    pool: DbPool,
}

impl DieselLedgerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl LedgerStore for DieselLedgerStore {
    fn create_bill(&self, customer_id: Uuid) -> Result<BillView, DomainError> {
        let mut conn = self.pool.get()?;

        let row: BillRow = diesel::insert_into(bills::table)
            .values(&NewBillRow {
                id: Uuid::new_v4(),
                customer_id,
            })
            .returning(BillRow::as_returning())
            .get_result(&mut conn)?;

        Ok(BillView {
            id: row.id,
            customer_id: row.customer_id,
            billing_date: row.billing_date,
            lines: vec![],
        })
    }

    fn find_bill(&self, id: Uuid) -> Result<Option<BillView>, DomainError> {
        let mut conn = self.pool.get()?;

        let bill = bills::table
            .filter(bills::id.eq(id))
            .select(BillRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(bill) = bill else {
            return Ok(None);
        };

        let lines = line_items::table
            .filter(line_items::bill_id.eq(bill.id))
            .select(LineItemRow::as_select())
            .load(&mut conn)?;

        Ok(Some(BillView {
            id: bill.id,
            customer_id: bill.customer_id,
            billing_date: bill.billing_date,
            lines: lines.into_iter().map(LineItemView::from).collect(),
        }))
    }

    fn list_bills(&self, page: i64, limit: i64) -> Result<BillPage, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1) * limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = bills::table.count().get_result(conn)?;

            let rows = bills::table
                .select(BillRow::as_select())
                .order(bills::billing_date.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(BillPage {
                items: rows
                    .into_iter()
                    .map(|b| BillView {
                        id: b.id,
                        customer_id: b.customer_id,
                        billing_date: b.billing_date,
                        lines: vec![],
                    })
                    .collect(),
                total,
            })
        })
    }

    fn delete_bill(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // Line items go with the bill via the ON DELETE CASCADE constraint.
        let deleted = diesel::delete(bills::table.filter(bills::id.eq(id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::BillNotFound);
        }
        Ok(())
    }

    fn items_for_bill(&self, bill_id: Uuid) -> Result<Vec<LineItemView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = line_items::table
            .filter(line_items::bill_id.eq(bill_id))
            .select(LineItemRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(LineItemView::from).collect())
    }

    fn find_item(&self, id: Uuid) -> Result<Option<LineItemView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = line_items::table
            .filter(line_items::id.eq(id))
            .select(LineItemRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(LineItemView::from))
    }

    fn insert_item(&self, item: NewLineItem) -> Result<LineItemView, DomainError> {
        let mut conn = self.pool.get()?;

        let row: LineItemRow = diesel::insert_into(line_items::table)
            .values(&NewLineItemRow {
                id: Uuid::new_v4(),
                bill_id: item.bill_id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .returning(LineItemRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn update_item_quantity(&self, id: Uuid, quantity: i32) -> Result<LineItemView, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<LineItemRow> =
            diesel::update(line_items::table.filter(line_items::id.eq(id)))
                .set(line_items::quantity.eq(quantity))
                .returning(LineItemRow::as_returning())
                .get_result(&mut conn)
                .optional()?;

        row.map(LineItemView::from)
            .ok_or(DomainError::LineItemNotFound)
    }

    fn delete_item(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let deleted =
            diesel::delete(line_items::table.filter(line_items::id.eq(id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::LineItemNotFound);
        }
        Ok(())
    }

    fn record_reconciliation(&self, record: ReconciliationRecord) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(inventory_reconciliation::table)
            .values(&NewReconciliationRow {
                id: Uuid::new_v4(),
                product_id: record.product_id,
                delta: record.delta,
                reason: record.reason,
            })
            .execute(&mut conn)?;

        Ok(())
    }
}
