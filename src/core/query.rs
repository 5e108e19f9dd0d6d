//! List filtering for invoices

use crate::core::datetime;
use crate::core::entity::Invoice;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::convert::Infallible;

/// Raw query parameters accepted by the list endpoint
///
/// # Example
/// ```text
/// GET /invoices?status=paid
/// GET /invoices?due_date_from=2024-05-01&due_date_to=2024-05-31
/// ```
#[derive(Debug, Clone, Default)]
pub struct InvoiceQuery {
    /// Exact status match
    pub status: Option<String>,

    /// Inclusive lower bound on `due_date`
    pub due_date_from: Option<String>,

    /// Inclusive upper bound on `due_date`
    ///
    /// A bare date covers the whole day.
    pub due_date_to: Option<String>,
}

impl InvoiceQuery {
    /// Fold raw `key=value` pairs into a query
    ///
    /// A repeated key keeps its last value. Unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "status" => query.status = Some(value),
                "due_date_from" => query.due_date_from = Some(value),
                "due_date_to" => query.due_date_to = Some(value),
                _ => {}
            }
        }
        query
    }

    /// Parse the raw parameters into a filter
    ///
    /// Empty parameters are treated as absent. Returns `None` when a date
    /// bound cannot be parsed: no invoice can satisfy such a bound.
    pub fn into_filter(self) -> Option<InvoiceFilter> {
        let bound = |field: &str, raw: Option<String>, end_of_day: bool| {
            let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
                return Some(None);
            };
            match datetime::parse(&raw) {
                Some(parsed) if end_of_day => Some(Some(parsed.end())),
                Some(parsed) => Some(Some(parsed.start())),
                None => {
                    tracing::debug!(field, value = %raw, "unparseable date bound");
                    None
                }
            }
        };

        let due_date_from = bound("due_date_from", self.due_date_from, false);
        let due_date_to = bound("due_date_to", self.due_date_to, true);

        Some(InvoiceFilter {
            status: self.status.filter(|s| !s.is_empty()),
            due_date_from: due_date_from?,
            due_date_to: due_date_to?,
        })
    }
}

impl<S> FromRequestParts<S> for InvoiceQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Query::<Vec<(String, String)>>::from_request_parts(parts, state).await {
            Ok(Query(pairs)) => pairs,
            Err(rejection) => {
                tracing::debug!(%rejection, "ignoring unreadable query string");
                Vec::new()
            }
        };
        Ok(Self::from_pairs(pairs))
    }
}

/// Independent, AND-combined predicates over invoices
///
/// A `None` field places no constraint on the corresponding column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceFilter {
    pub status: Option<String>,
    pub due_date_from: Option<NaiveDateTime>,
    pub due_date_to: Option<NaiveDateTime>,
}

impl InvoiceFilter {
    /// Filter with no predicates
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_due_date_from(mut self, from: NaiveDateTime) -> Self {
        self.due_date_from = Some(from);
        self
    }

    pub fn with_due_date_to(mut self, to: NaiveDateTime) -> Self {
        self.due_date_to = Some(to);
        self
    }

    /// Whether any predicate is set
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.due_date_from.is_none() && self.due_date_to.is_none()
    }

    /// Evaluate the filter against a single invoice
    ///
    /// Invoices without a due date never satisfy a due date bound.
    pub fn matches(&self, invoice: &Invoice) -> bool {
        let status_ok = self
            .status
            .as_deref()
            .is_none_or(|status| invoice.status.as_str() == status);

        let from_ok = self
            .due_date_from
            .is_none_or(|from| invoice.due_date.is_some_and(|due| due >= from));

        let to_ok = self
            .due_date_to
            .is_none_or(|to| invoice.due_date.is_some_and(|due| due <= to));

        status_ok && from_ok && to_ok
    }
}
