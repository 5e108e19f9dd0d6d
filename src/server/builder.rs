//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use crate::core::service::InvoiceRepository;
use crate::invoices::handlers::InvoiceAppState;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Default prefix for the invoice routes
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Builder for creating the invoice HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_repository(InMemoryInvoiceRepository::new())
///     .with_api_prefix("/api")
///     .build()?;
/// ```
pub struct ServerBuilder {
    repository: Option<Arc<dyn InvoiceRepository>>,
    api_prefix: String,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            repository: None,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the invoice repository (required)
    pub fn with_repository(mut self, repository: impl InvoiceRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Set an already shared invoice repository (required)
    pub fn with_shared_repository(mut self, repository: Arc<dyn InvoiceRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Mount the invoice routes under `prefix` instead of `/api`
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Add custom routes to the server, merged at the root
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let repository = self.repository.take().ok_or_else(|| {
            anyhow::anyhow!("InvoiceRepository is required. Call .with_repository()")
        })?;

        let state = InvoiceAppState::new(repository);
        let router = RestExposure::build_router(state, &self.api_prefix, self.custom_routes)?;

        Ok(router.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr` and serves until SIGTERM or Ctrl+C is received.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
///
/// A handler that fails to install never resolves, leaving the other one
/// in charge.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
