//! Storage implementations for different backends

pub mod in_memory;
pub mod seed;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryInvoiceRepository;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteInvoiceRepository;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::service::InvoiceRepository;
use anyhow::Result;
use std::sync::Arc;

/// Open the backend selected by the configuration
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn InvoiceRepository>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage");
            Ok(Arc::new(InMemoryInvoiceRepository::new()))
        }
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => {
            let url = config.url.as_deref().unwrap_or("sqlite::memory:");
            Ok(Arc::new(SqliteInvoiceRepository::connect(url).await?))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageBackend::Sqlite => {
            Err(crate::config::ConfigError::BackendUnavailable("sqlite".to_string()).into())
        }
    }
}
