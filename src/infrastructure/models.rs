use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{bills, inventory_reconciliation, line_items};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = bills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BillRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub billing_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bills)]
pub struct NewBillRow {
    pub id: Uuid,
    pub customer_id: Uuid,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = line_items)]
#[diesel(belongs_to(BillRow, foreign_key = bill_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LineItemRow {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = line_items)]
pub struct NewLineItemRow {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = inventory_reconciliation)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReconciliationRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub delta: i32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = inventory_reconciliation)]
pub struct NewReconciliationRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub delta: i32,
    pub reason: String,
}
