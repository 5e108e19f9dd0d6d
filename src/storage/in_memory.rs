//! In-memory implementation of the repositories for testing and development

use crate::core::datetime;
use crate::core::entity::{Invoice, InvoiceDraft, InvoiceTag, Tag};
use crate::core::query::InvoiceFilter;
use crate::core::service::{InvoiceRepository, TagRepository};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Tables held behind a single lock so id assignment and insert are atomic
#[derive(Default)]
struct Tables {
    invoices: BTreeMap<i64, Invoice>,
    tags: BTreeMap<i64, Tag>,
    invoice_tag: BTreeSet<InvoiceTag>,
    last_invoice_id: i64,
    last_tag_id: i64,
}

/// In-memory repository implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Ids come from monotonic counters and are never reused, even after a
/// delete.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryInvoiceRepository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn create(&self, draft: InvoiceDraft) -> Result<Invoice> {
        let mut tables = self.write()?;

        tables.last_invoice_id += 1;
        let invoice = Invoice::from_draft(tables.last_invoice_id, draft, datetime::now());
        tables.invoices.insert(invoice.id, invoice.clone());

        Ok(invoice)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>> {
        Ok(self.read()?.invoices.get(&id).cloned())
    }

    async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
        let tables = self.read()?;

        Ok(tables
            .invoices
            .values()
            .filter(|invoice| filter.matches(invoice))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<Option<Invoice>> {
        let mut tables = self.write()?;

        let removed = tables.invoices.remove(&id);
        if removed.is_some() {
            tables.invoice_tag.retain(|row| row.invoice_id != id);
        }

        Ok(removed)
    }
}

#[async_trait]
impl TagRepository for InMemoryInvoiceRepository {
    async fn create_tag(&self, name: &str) -> Result<Tag> {
        let mut tables = self.write()?;

        tables.last_tag_id += 1;
        let tag = Tag {
            id: tables.last_tag_id,
            name: name.to_string(),
        };
        tables.tags.insert(tag.id, tag.clone());

        Ok(tag)
    }

    async fn attach_tag(&self, invoice_id: i64, tag_id: i64) -> Result<bool> {
        let mut tables = self.write()?;

        if !tables.invoices.contains_key(&invoice_id) || !tables.tags.contains_key(&tag_id) {
            return Ok(false);
        }
        tables.invoice_tag.insert(InvoiceTag { invoice_id, tag_id });

        Ok(true)
    }

    async fn tags_for_invoice(&self, invoice_id: i64) -> Result<Vec<Tag>> {
        let tables = self.read()?;

        Ok(tables
            .invoice_tag
            .iter()
            .filter(|row| row.invoice_id == invoice_id)
            .filter_map(|row| tables.tags.get(&row.tag_id).cloned())
            .collect())
    }

    async fn invoices_for_tag(&self, tag_id: i64) -> Result<Vec<Invoice>> {
        let tables = self.read()?;

        Ok(tables
            .invoice_tag
            .iter()
            .filter(|row| row.tag_id == tag_id)
            .filter_map(|row| tables.invoices.get(&row.invoice_id).cloned())
            .collect())
    }
}
