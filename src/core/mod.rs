//! Core module containing the domain types, validation and repository traits

pub mod datetime;
pub mod entity;
pub mod error;
pub mod query;
pub mod service;
pub mod validation;

pub use entity::{Entity, Invoice, InvoiceDraft, InvoiceStatus, InvoiceTag, Tag};
pub use error::{ApiError, ApiResult};
pub use query::{InvoiceFilter, InvoiceQuery};
pub use service::{InvoiceRepository, TagRepository};
