//! Sample data for local development and tests

use crate::core::entity::{Invoice, InvoiceDraft, InvoiceStatus};
use crate::core::service::InvoiceRepository;
use anyhow::Result;
use chrono::{Days, NaiveDate};

const CUSTOMERS: &[&str] = &[
    "John Doe",
    "Acme Corporation",
    "Globex Ltd",
    "Initech",
    "Umbrella Holdings",
    "Jane Smith",
    "Stark Industries",
];

/// Due date of the first sample draft
const FIRST_DUE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 15) {
    Some(date) => date,
    None => panic!("2024-01-15 is a valid date"),
};

const TITLES: &[&str] = &[
    "Monthly Service",
    "Website Redesign",
    "Annual Support Contract",
    "Hardware Purchase",
    "Consulting Hours",
    "Cloud Hosting",
];

/// Deterministically generate `count` valid invoice drafts
///
/// Statuses cycle through every variant, due dates step through 2024 and
/// every fourth draft has neither a description nor a due date.
pub fn sample_drafts(count: usize) -> Vec<InvoiceDraft> {
    (0..count)
        .map(|i| {
            let sparse = i % 4 == 3;
            let due_date = (!sparse)
                .then(|| FIRST_DUE_DATE.checked_add_days(Days::new(i as u64 * 9)))
                .flatten()
                .and_then(|d| d.and_hms_opt(0, 0, 0));

            InvoiceDraft {
                invoice_number: format!("INV-{:03}", i + 1),
                customer_name: CUSTOMERS[i % CUSTOMERS.len()].to_string(),
                title: TITLES[i % TITLES.len()].to_string(),
                description: (!sparse)
                    .then(|| format!("{} for {}", TITLES[i % TITLES.len()], CUSTOMERS[i % CUSTOMERS.len()])),
                status: InvoiceStatus::ALL[i % InvoiceStatus::ALL.len()],
                due_date,
            }
        })
        .collect()
}

/// Persist `count` sample invoices
pub async fn seed<R>(repo: &R, count: usize) -> Result<Vec<Invoice>>
where
    R: InvoiceRepository + ?Sized,
{
    let mut created = Vec::with_capacity(count);
    for draft in sample_drafts(count) {
        created.push(repo.create(draft).await?);
    }
    tracing::info!(count = created.len(), "seeded sample invoices");
    Ok(created)
}
