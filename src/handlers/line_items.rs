use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::billing::{LineItemView, Reservation};
use crate::domain::ports::LedgerStore;
use crate::errors::AppError;
use crate::AppState;

use super::bills::LineItemResponse;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddLineItemRequest {
    pub bill_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityParams {
    pub quantity: i32,
}

/// A committed line item plus whether the paired remote stock adjustment
/// landed. `inventory_drift: true` means the item is billed but the
/// authority's count is stale until reconciled out-of-band.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservedLineItemResponse {
    pub item: LineItemResponse,
    pub inventory_drift: bool,
}

impl From<Reservation<LineItemView>> for ReservedLineItemResponse {
    fn from(reservation: Reservation<LineItemView>) -> Self {
        let inventory_drift = reservation.drifted();
        ReservedLineItemResponse {
            item: reservation.value.into(),
            inventory_drift,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /bills/{id}/items
///
/// Returns the line items of one bill.
#[utoipa::path(
    get,
    path = "/bills/{id}/items",
    params(
        ("id" = Uuid, Path, description = "Bill UUID"),
    ),
    responses(
        (status = 200, description = "Line items of the bill", body = [LineItemResponse]),
        (status = 404, description = "Bill not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "line-items"
)]
pub async fn items_for_bill(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let ledger = data.ledger.clone();
    let bill_id = path.into_inner();

    let items = web::block(move || {
        if ledger.find_bill(bill_id)?.is_none() {
            return Err(crate::domain::errors::DomainError::BillNotFound);
        }
        ledger.items_for_bill(bill_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<LineItemResponse> = items.into_iter().map(LineItemResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// POST /line-items
///
/// Adds a line item to a bill through the coordinator: stock availability
/// and the current unit price are confirmed with the inventory authority
/// before the ledger write, then the stock debit is applied. A failed debit
/// does not fail the request; it is reported via `inventory_drift`.
#[utoipa::path(
    post,
    path = "/line-items",
    request_body = AddLineItemRequest,
    responses(
        (status = 201, description = "Line item created", body = ReservedLineItemResponse),
        (status = 400, description = "Quantity is not a positive integer"),
        (status = 404, description = "Bill not found"),
        (status = 409, description = "Insufficient stock"),
        (status = 502, description = "Inventory authority unreachable before the write"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "line-items"
)]
pub async fn add_line_item(
    data: web::Data<AppState>,
    body: web::Json<AddLineItemRequest>,
) -> Result<HttpResponse, AppError> {
    let coordinator = data.coordinator.clone();
    let request = body.into_inner();

    let reservation = web::block(move || {
        coordinator.add_line_item(request.bill_id, request.product_id, request.quantity)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ReservedLineItemResponse::from(reservation)))
}

/// PATCH /line-items/{id}/quantity
///
/// Changes an item's quantity; the signed difference is applied to remote
/// stock before the local write commits.
#[utoipa::path(
    patch,
    path = "/line-items/{id}/quantity",
    params(
        ("id" = Uuid, Path, description = "Line item UUID"),
        ("quantity" = i32, Query, description = "New quantity (positive integer)"),
    ),
    responses(
        (status = 200, description = "Quantity updated", body = ReservedLineItemResponse),
        (status = 400, description = "Quantity is not a positive integer"),
        (status = 404, description = "Line item not found"),
        (status = 409, description = "Insufficient stock for the increase"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "line-items"
)]
pub async fn update_line_item_quantity(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<UpdateQuantityParams>,
) -> Result<HttpResponse, AppError> {
    let coordinator = data.coordinator.clone();
    let item_id = path.into_inner();
    let quantity = query.into_inner().quantity;

    let reservation =
        web::block(move || coordinator.update_line_item_quantity(item_id, quantity))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ReservedLineItemResponse::from(reservation)))
}

/// DELETE /line-items/{id}
///
/// Removes a line item, returning its quantity to remote stock. Removal
/// always succeeds locally once the item is found; a failed stock return is
/// logged and recorded for reconciliation.
#[utoipa::path(
    delete,
    path = "/line-items/{id}",
    params(
        ("id" = Uuid, Path, description = "Line item UUID"),
    ),
    responses(
        (status = 204, description = "Line item removed"),
        (status = 404, description = "Line item not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "line-items"
)]
pub async fn remove_line_item(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let coordinator = data.coordinator.clone();
    let item_id = path.into_inner();

    web::block(move || coordinator.remove_line_item(item_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
