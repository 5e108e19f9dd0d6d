//! Validation of incoming payloads
//!
//! Raw JSON is checked against a declarative [`RuleSet`](rules::RuleSet)
//! and normalized into a typed draft before it reaches the repository.
//! All failures are collected and reported together.

pub mod extractor;
pub mod rules;
pub mod validators;

pub use extractor::Validated;
pub use rules::{FieldRule, RuleSet, TITLE_MAX_CHARS, Validate, invoice_rules};
