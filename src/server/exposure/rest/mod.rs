//! REST API exposure
//!
//! Consumes an [`InvoiceAppState`] and produces an Axum `Router` with the
//! invoice resource mounted under the configured prefix and the health
//! checks at the root.

use crate::invoices::handlers::InvoiceAppState;
use crate::server::router::{build_invoice_routes, mount};
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

/// Name reported by the health check endpoints
pub const SERVICE_NAME: &str = "invoice-api";

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// # Arguments
    ///
    /// * `state` - Shared handler state holding the repository
    /// * `api_prefix` - Prefix for the invoice routes (e.g. `/api`)
    /// * `custom_routes` - Additional routes merged at the root
    pub fn build_router(
        state: InvoiceAppState,
        api_prefix: &str,
        custom_routes: Vec<Router>,
    ) -> Result<Router> {
        let invoice_routes = mount(api_prefix, build_invoice_routes(state));

        let mut app = Self::health_routes().merge(invoice_routes);
        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app)
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME
        }))
    }
}
