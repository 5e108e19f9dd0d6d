//! Invoice resource: HTTP handlers and response types

pub mod handlers;

pub use handlers::{
    DeleteInvoiceResponse, InvoiceAppState, ListInvoicesResponse, create_invoice, delete_invoice,
    get_invoice, list_invoices,
};
