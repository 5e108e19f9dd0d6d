//! Repository traits for invoice and tag storage

use crate::core::entity::{Invoice, InvoiceDraft, Tag};
use crate::core::query::InvoiceFilter;
use anyhow::Result;
use async_trait::async_trait;

/// Storage operations for invoices
///
/// A missing record is reported as `Ok(None)`; `Err` is reserved for
/// infrastructure failures. The API is agnostic to the storage mechanism.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Persist a validated draft and return the stored record
    ///
    /// Assigns a fresh id and sets `created_at == updated_at`.
    async fn create(&self, draft: InvoiceDraft) -> Result<Invoice>;

    /// Get an invoice by id
    async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>>;

    /// List invoices matching the filter, ordered by id ascending
    async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>>;

    /// Permanently delete an invoice, returning it as it was
    ///
    /// Rows of the `invoice_tag` join table that reference the invoice are
    /// removed with it.
    async fn delete(&self, id: i64) -> Result<Option<Invoice>>;
}

/// Storage operations for tags and their association with invoices
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Create a new tag
    async fn create_tag(&self, name: &str) -> Result<Tag>;

    /// Associate a tag with an invoice
    ///
    /// Returns `false` when either side does not exist. Attaching an
    /// existing pair again is a no-op.
    async fn attach_tag(&self, invoice_id: i64, tag_id: i64) -> Result<bool>;

    /// Tags attached to an invoice, ordered by tag id
    async fn tags_for_invoice(&self, invoice_id: i64) -> Result<Vec<Tag>>;

    /// Invoices carrying a tag, ordered by invoice id
    async fn invoices_for_tag(&self, tag_id: i64) -> Result<Vec<Invoice>>;
}
