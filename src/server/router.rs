//! Router builder utilities for invoice routes

use crate::invoices::handlers::{
    InvoiceAppState, create_invoice, delete_invoice, get_invoice, list_invoices,
};
use axum::{Router, routing::get};

/// Build the invoice routes
///
/// - GET /invoices - List invoices (filterable by status and due date window)
/// - POST /invoices - Create an invoice
/// - GET /invoices/{id} - Get a single invoice
/// - DELETE /invoices/{id} - Delete an invoice
pub fn build_invoice_routes(state: InvoiceAppState) -> Router {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}", get(get_invoice).delete(delete_invoice))
        .with_state(state)
}

/// Mount `routes` under `prefix`
///
/// An empty prefix or `/` mounts the routes at the root.
pub fn mount(prefix: &str, routes: Router) -> Router {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        routes
    } else if prefix.starts_with('/') {
        Router::new().nest(prefix, routes)
    } else {
        Router::new().nest(&format!("/{prefix}"), routes)
    }
}
