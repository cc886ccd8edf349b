use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::billing::{BillView, LineItemView};
use crate::domain::ports::LedgerStore;
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBillRequest {
    pub customer_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LineItemResponse {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
}

impl From<LineItemView> for LineItemResponse {
    fn from(item: LineItemView) -> Self {
        LineItemResponse {
            id: item.id,
            bill_id: item.bill_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub billing_date: String,
    pub lines: Vec<LineItemResponse>,
}

impl From<BillView> for BillResponse {
    fn from(bill: BillView) -> Self {
        BillResponse {
            id: bill.id,
            customer_id: bill.customer_id,
            billing_date: bill.billing_date.to_rfc3339(),
            lines: bill.lines.into_iter().map(LineItemResponse::from).collect(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListBillsParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListBillsResponse {
    pub items: Vec<BillResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /bills
///
/// Opens a new bill for a customer. The customer reference is immutable for
/// the lifetime of the bill; line items are attached later through the
/// coordinated line-item endpoints.
#[utoipa::path(
    post,
    path = "/bills",
    request_body = CreateBillRequest,
    responses(
        (status = 201, description = "Bill created successfully", body = BillResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bills"
)]
pub async fn create_bill(
    data: web::Data<AppState>,
    body: web::Json<CreateBillRequest>,
) -> Result<HttpResponse, AppError> {
    let ledger = data.ledger.clone();
    let customer_id = body.into_inner().customer_id;

    let bill = web::block(move || ledger.create_bill(customer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(BillResponse::from(bill)))
}

/// GET /bills/{id}
///
/// Returns the bill together with its line items.
#[utoipa::path(
    get,
    path = "/bills/{id}",
    params(
        ("id" = Uuid, Path, description = "Bill UUID"),
    ),
    responses(
        (status = 200, description = "Bill found", body = BillResponse),
        (status = 404, description = "Bill not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bills"
)]
pub async fn get_bill(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let ledger = data.ledger.clone();
    let bill_id = path.into_inner();

    let bill = web::block(move || ledger.find_bill(bill_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match bill {
        Some(bill) => Ok(HttpResponse::Ok().json(BillResponse::from(bill))),
        None => Err(AppError::NotFound),
    }
}

/// GET /bills
///
/// Returns a paginated list of bills (without their line items).
/// Use `page` (1-based) and `limit` to control pagination.
#[utoipa::path(
    get,
    path = "/bills",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of bills", body = ListBillsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bills"
)]
pub async fn list_bills(
    data: web::Data<AppState>,
    query: web::Query<ListBillsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let ledger = data.ledger.clone();
    let result = web::block(move || ledger.list_bills(page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListBillsResponse {
        items: result.items.into_iter().map(BillResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// DELETE /bills/{id}
///
/// Deletes a bill and all of its line items.
#[utoipa::path(
    delete,
    path = "/bills/{id}",
    params(
        ("id" = Uuid, Path, description = "Bill UUID"),
    ),
    responses(
        (status = 204, description = "Bill deleted"),
        (status = 404, description = "Bill not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bills"
)]
pub async fn delete_bill(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let ledger = data.ledger.clone();
    let bill_id = path.into_inner();

    web::block(move || ledger.delete_bill(bill_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
