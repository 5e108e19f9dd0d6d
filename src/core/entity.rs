//! Entity types for invoices, tags and the join rows between them

use crate::core::datetime;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base trait for persisted records.
///
/// Every record carries an immutable, system-assigned integer id. Records
/// are identified in URLs and error messages by their resource names.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "invoices")
    fn resource_name() -> &'static str;

    /// The singular, human-facing name (e.g., "Invoice")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> i64;
}

/// Lifecycle status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Every accepted status, in declaration order
    pub const ALL: [InvoiceStatus; 5] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Sent,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
        InvoiceStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known statuses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown invoice status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for InvoiceStatus {
    type Err = UnknownStatus;

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InvoiceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A validated invoice payload that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub invoice_number: String,
    pub customer_name: String,
    pub title: String,
    pub description: Option<String>,
    pub status: InvoiceStatus,
    pub due_date: Option<NaiveDateTime>,
}

/// A stored invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub customer_name: String,
    pub title: String,
    pub description: Option<String>,
    pub status: InvoiceStatus,
    #[serde(with = "datetime::wire_option")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(with = "datetime::wire")]
    pub created_at: NaiveDateTime,
    #[serde(with = "datetime::wire")]
    pub updated_at: NaiveDateTime,
}

impl Invoice {
    /// Materialize a draft with its assigned id and creation time
    ///
    /// `due_date` is truncated to whole seconds, the precision it is stored at.
    pub fn from_draft(id: i64, draft: InvoiceDraft, now: NaiveDateTime) -> Self {
        Self {
            id,
            invoice_number: draft.invoice_number,
            customer_name: draft.customer_name,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            due_date: draft.due_date.map(datetime::truncate),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Invoice {
    fn resource_name() -> &'static str {
        "invoices"
    }

    fn resource_name_singular() -> &'static str {
        "Invoice"
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// A named label that can be attached to many invoices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl Entity for Tag {
    fn resource_name() -> &'static str {
        "tags"
    }

    fn resource_name_singular() -> &'static str {
        "Tag"
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Row of the `invoice_tag` join table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InvoiceTag {
    pub invoice_id: i64,
    pub tag_id: i64,
}
