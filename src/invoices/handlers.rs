//! HTTP handlers for invoice operations
//!
//! Each handler is a single stateless request/response exchange that
//! delegates to the [`InvoiceRepository`] held in [`InvoiceAppState`].

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::entity::{Invoice, InvoiceDraft};
use crate::core::error::{ApiResult, EntityError};
use crate::core::query::InvoiceQuery;
use crate::core::service::InvoiceRepository;
use crate::core::validation::Validated;

/// Confirmation returned by the delete endpoint
pub const DELETED_MESSAGE: &str = "Invoice deleted successfully";

/// Application state shared across invoice handlers
#[derive(Clone)]
pub struct InvoiceAppState {
    pub repository: Arc<dyn InvoiceRepository>,
}

impl InvoiceAppState {
    pub fn new(repository: Arc<dyn InvoiceRepository>) -> Self {
        Self { repository }
    }
}

/// Response envelope for the list endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ListInvoicesResponse {
    pub data: Vec<Invoice>,
}

/// Response for the delete endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteInvoiceResponse {
    pub message: String,
    pub id: i64,
}

/// Ids that are not integers cannot match any record
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| EntityError::not_found::<Invoice>(raw).into())
}

/// List invoices, optionally filtered
///
/// GET /invoices?status=&due_date_from=&due_date_to=
pub async fn list_invoices(
    State(state): State<InvoiceAppState>,
    query: InvoiceQuery,
) -> ApiResult<Json<ListInvoicesResponse>> {
    let Some(filter) = query.into_filter() else {
        return Ok(Json(ListInvoicesResponse { data: Vec::new() }));
    };
    let data = state.repository.list(&filter).await?;

    tracing::debug!(?filter, count = data.len(), "listed invoices");
    Ok(Json(ListInvoicesResponse { data }))
}

/// Get a single invoice
///
/// GET /invoices/{id}
pub async fn get_invoice(
    State(state): State<InvoiceAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    let id = parse_id(&id)?;

    match state.repository.find_by_id(id).await? {
        Some(invoice) => Ok(Json(invoice)),
        None => {
            tracing::debug!(id, "invoice not found");
            Err(EntityError::not_found::<Invoice>(id).into())
        }
    }
}

/// Create an invoice from a validated payload
///
/// POST /invoices
pub async fn create_invoice(
    State(state): State<InvoiceAppState>,
    Validated(draft): Validated<InvoiceDraft>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    let invoice = state.repository.create(draft).await?;

    tracing::info!(
        id = invoice.id,
        invoice_number = %invoice.invoice_number,
        status = %invoice.status,
        "invoice created"
    );
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// Permanently delete an invoice
///
/// DELETE /invoices/{id}
pub async fn delete_invoice(
    State(state): State<InvoiceAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteInvoiceResponse>> {
    let id = parse_id(&id)?;

    let deleted = state
        .repository
        .delete(id)
        .await?
        .ok_or_else(|| EntityError::not_found::<Invoice>(id))?;

    tracing::info!(id = deleted.id, "invoice deleted");
    Ok(Json(DeleteInvoiceResponse {
        message: DELETED_MESSAGE.to_string(),
        id: deleted.id,
    }))
}
