//! # Invoice API
//!
//! A small REST service for managing invoices.
//!
//! ## Features
//!
//! - **CRUD over HTTP**: list, fetch, create and delete invoices
//! - **Filtering**: by status and by an inclusive due date window
//! - **Validation**: every create payload is checked before it reaches storage,
//!   and failures come back as a 422 with a per-field error map
//! - **Pluggable storage**: an in-memory backend and an SQLite backend behind the
//!   same [`InvoiceRepository`](core::service::InvoiceRepository) trait
//! - **Tags**: a many-to-many invoice/tag association maintained by storage
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_api::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_repository(InMemoryInvoiceRepository::new())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod invoices;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::{Entity, Invoice, InvoiceDraft, InvoiceStatus, InvoiceTag, Tag},
        error::{ApiError, ApiResult, EntityError, ValidationError},
        query::{InvoiceFilter, InvoiceQuery},
        service::{InvoiceRepository, TagRepository},
        validation::{Validate, Validated},
    };

    // === Handlers ===
    pub use crate::invoices::handlers::{
        InvoiceAppState, create_invoice, delete_invoice, get_invoice, list_invoices,
    };

    // === Storage ===
    pub use crate::storage::InMemoryInvoiceRepository;
    #[cfg(feature = "sqlite")]
    pub use crate::storage::SqliteInvoiceRepository;

    // === Config ===
    pub use crate::config::{AppConfig, ServerConfig, StorageBackend, StorageConfig};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDateTime;
    pub use serde::{Deserialize, Serialize};

    // === Axum ===
    pub use axum::{
        Router,
        extract::{Path, Query, State},
        routing::{delete, get, post},
    };
}
