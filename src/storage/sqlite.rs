//! SQLite storage backend using sqlx.
//!
//! Provides `SqliteInvoiceRepository`, implementing both repository traits
//! against a `sqlx::SqlitePool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `sqlite` feature flag:
//! ```toml
//! [dependencies]
//! invoice-api = { version = "0.1", features = ["sqlite"] }
//! ```
//!
//! # Schema
//!
//! - `invoices`: one row per invoice, timestamps stored as
//!   `YYYY-MM-DDTHH:MM:SS` text so that lexical order is chronological
//! - `tags`: id + name
//! - `invoice_tag`: join table, cascades when either side is deleted

use crate::core::datetime;
use crate::core::entity::{Invoice, InvoiceDraft, Tag};
use crate::core::error::StorageError;
use crate::core::query::InvoiceFilter;
use crate::core::service::{InvoiceRepository, TagRepository};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Connection & schema management
// ---------------------------------------------------------------------------

/// Open a pool for the given SQLite URL
///
/// In-memory databases live as long as their connection, so they get a
/// single connection that is never recycled.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid SQLite URL: {}", url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new();
    if url.contains(":memory:") {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    pool_options.connect_with(options).await.map_err(|e| {
        anyhow::Error::new(StorageError::ConnectionError {
            backend: "SQLite".to_string(),
            message: e.to_string(),
        })
    })
}

/// Apply the required tables and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            invoice_number TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NULL,
            status TEXT NOT NULL
                CHECK (status IN ('draft', 'sent', 'paid', 'overdue', 'cancelled')),
            due_date TEXT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create invoices table: {}", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_status ON invoices (status)")
        .execute(pool)
        .await
        .map_err(|e| anyhow!("Failed to create status index: {}", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_due_date ON invoices (due_date)")
        .execute(pool)
        .await
        .map_err(|e| anyhow!("Failed to create due_date index: {}", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create tags table: {}", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoice_tag (
            invoice_id INTEGER NOT NULL REFERENCES invoices (id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags (id) ON DELETE CASCADE,
            PRIMARY KEY (invoice_id, tag_id)
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create invoice_tag table: {}", e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

const INVOICE_COLUMNS: &str = "id, invoice_number, customer_name, title, description, \
                               status, due_date, created_at, updated_at";

type InvoiceRow = (
    i64,
    String,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    String,
    String,
);

fn parse_timestamp(column: &str, raw: &str) -> Result<chrono::NaiveDateTime> {
    datetime::parse(raw)
        .map(|parsed| parsed.start())
        .ok_or_else(|| anyhow!("Invalid timestamp in column {}: {}", column, raw))
}

/// Stored timestamps have whole seconds, so a fractional lower bound rounds up
fn ceil_to_second(dt: chrono::NaiveDateTime) -> chrono::NaiveDateTime {
    let truncated = datetime::truncate(dt);
    if truncated < dt {
        truncated + chrono::TimeDelta::seconds(1)
    } else {
        truncated
    }
}

fn invoice_from_row(row: InvoiceRow) -> Result<Invoice> {
    let (id, invoice_number, customer_name, title, description, status, due, created, updated) =
        row;

    Ok(Invoice {
        id,
        invoice_number,
        customer_name,
        title,
        description,
        status: status
            .parse()
            .map_err(|e| anyhow!("Corrupt invoice {}: {}", id, e))?,
        due_date: due
            .as_deref()
            .map(|raw| parse_timestamp("due_date", raw))
            .transpose()?,
        created_at: parse_timestamp("created_at", &created)?,
        updated_at: parse_timestamp("updated_at", &updated)?,
    })
}

// ---------------------------------------------------------------------------
// SqliteInvoiceRepository
// ---------------------------------------------------------------------------

/// Invoice and tag storage backed by SQLite.
///
/// # Example
///
/// ```rust,ignore
/// use invoice_api::storage::SqliteInvoiceRepository;
///
/// let repo = SqliteInvoiceRepository::connect("sqlite://invoices.db").await?;
/// let invoice = repo.create(draft).await?;
/// ```
#[derive(Clone, Debug)]
pub struct SqliteInvoiceRepository {
    pool: SqlitePool,
}

impl SqliteInvoiceRepository {
    /// Wrap an existing pool; the schema must already exist
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the schema exists
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = connect(url).await?;
        ensure_schema(&pool).await?;
        tracing::info!(url, "SQLite storage ready");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl InvoiceRepository for SqliteInvoiceRepository {
    async fn create(&self, draft: InvoiceDraft) -> Result<Invoice> {
        let now = datetime::now();
        let stamp = datetime::format(&now);

        let result = sqlx::query(
            "INSERT INTO invoices (invoice_number, customer_name, title, description, \
             status, due_date, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.invoice_number)
        .bind(&draft.customer_name)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.status.as_str())
        .bind(draft.due_date.as_ref().map(datetime::format))
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to create invoice: {}", e))?;

        Ok(Invoice::from_draft(result.last_insert_rowid(), draft, now))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>> {
        let sql = format!("SELECT {} FROM invoices WHERE id = ?", INVOICE_COLUMNS);
        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to get invoice: {}", e))?;

        row.map(invoice_from_row).transpose()
    }

    async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM invoices WHERE 1 = 1",
            INVOICE_COLUMNS
        ));

        if let Some(status) = &filter.status {
            query.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(from) = &filter.due_date_from {
            query
                .push(" AND due_date IS NOT NULL AND due_date >= ")
                .push_bind(datetime::format(&ceil_to_second(*from)));
        }
        if let Some(to) = &filter.due_date_to {
            query
                .push(" AND due_date IS NOT NULL AND due_date <= ")
                .push_bind(datetime::format(to));
        }
        query.push(" ORDER BY id ASC");

        let rows = query
            .build_query_as::<InvoiceRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to list invoices: {}", e))?;

        rows.into_iter().map(invoice_from_row).collect()
    }

    async fn delete(&self, id: i64) -> Result<Option<Invoice>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| anyhow!("Failed to begin transaction: {}", e))?;

        let sql = format!("SELECT {} FROM invoices WHERE id = ?", INVOICE_COLUMNS);
        let Some(row) = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to get invoice: {}", e))?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM invoice_tag WHERE invoice_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to detach tags: {}", e))?;

        sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to delete invoice: {}", e))?;

        tx.commit()
            .await
            .map_err(|e| anyhow!("Failed to commit delete: {}", e))?;

        invoice_from_row(row).map(Some)
    }
}

#[async_trait]
impl TagRepository for SqliteInvoiceRepository {
    async fn create_tag(&self, name: &str) -> Result<Tag> {
        let result = sqlx::query("INSERT INTO tags (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to create tag: {}", e))?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    async fn attach_tag(&self, invoice_id: i64, tag_id: i64) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| anyhow!("Failed to begin transaction: {}", e))?;

        let (invoice_exists, tag_exists) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT EXISTS (SELECT 1 FROM invoices WHERE id = ?), \
                    EXISTS (SELECT 1 FROM tags WHERE id = ?)",
        )
        .bind(invoice_id)
        .bind(tag_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| anyhow!("Failed to check tag association: {}", e))?;

        if invoice_exists == 0 || tag_exists == 0 {
            return Ok(false);
        }

        sqlx::query("INSERT OR IGNORE INTO invoice_tag (invoice_id, tag_id) VALUES (?, ?)")
            .bind(invoice_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to attach tag: {}", e))?;

        tx.commit()
            .await
            .map_err(|e| anyhow!("Failed to commit tag association: {}", e))?;

        Ok(true)
    }

    async fn tags_for_invoice(&self, invoice_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT t.id, t.name FROM tags t \
             JOIN invoice_tag it ON it.tag_id = t.id \
             WHERE it.invoice_id = ? ORDER BY t.id ASC",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to list tags: {}", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Tag { id, name })
            .collect())
    }

    async fn invoices_for_tag(&self, tag_id: i64) -> Result<Vec<Invoice>> {
        let sql = format!(
            "SELECT {} FROM invoices \
             WHERE id IN (SELECT invoice_id FROM invoice_tag WHERE tag_id = ?) \
             ORDER BY id ASC",
            INVOICE_COLUMNS
        );
        let rows = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(tag_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to list invoices for tag: {}", e))?;

        rows.into_iter().map(invoice_from_row).collect()
    }
}
