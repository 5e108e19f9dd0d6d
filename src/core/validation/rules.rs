//! Declarative field rules and the invoice rule set

use super::validators::{self, Validator, date, in_list, is_blank, max_chars, required, string};
use crate::core::datetime;
use crate::core::entity::{InvoiceDraft, InvoiceStatus};
use crate::core::error::ValidationError;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Maximum title length, in characters
pub const TITLE_MAX_CHARS: usize = 255;

const STATUS_VALUES: &[&str] = &["draft", "sent", "paid", "overdue", "cancelled"];

/// Rules attached to a single input field
pub struct FieldRule {
    field: &'static str,
    required: bool,
    validators: Vec<Validator>,
}

impl FieldRule {
    /// A field that must be present and non-blank
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            required: true,
            validators: Vec::new(),
        }
    }

    /// A field that may be absent, null or blank
    pub fn nullable(field: &'static str) -> Self {
        Self {
            field,
            required: false,
            validators: Vec::new(),
        }
    }

    /// Append a validator
    pub fn check<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    fn apply(&self, input: &Map<String, Value>, errors: &mut ValidationError) {
        let value = input.get(self.field).unwrap_or(&Value::Null);

        if self.required {
            if let Err(msg) = required()(self.field, value) {
                errors.add(self.field, msg);
                return;
            }
        } else if is_blank(value) {
            return;
        }

        for validator in &self.validators {
            if let Err(msg) = validator(self.field, value) {
                errors.add(self.field, msg);
            }
        }
    }
}

/// An ordered set of field rules
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Run every rule and collect all failures
    pub fn check(&self, input: &Map<String, Value>) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        for rule in &self.rules {
            rule.apply(input, &mut errors);
        }
        errors.into_result(|| ())
    }
}

/// Rules for creating an invoice
pub fn invoice_rules() -> &'static RuleSet {
    static RULES: OnceLock<RuleSet> = OnceLock::new();
    RULES.get_or_init(|| {
        RuleSet::new(vec![
            FieldRule::required("invoice_number").check(string()),
            FieldRule::required("customer_name").check(string()),
            FieldRule::required("title")
                .check(string())
                .check(max_chars(TITLE_MAX_CHARS)),
            FieldRule::nullable("description").check(string()),
            FieldRule::required("status").check(in_list(STATUS_VALUES)),
            FieldRule::nullable("due_date").check(date()),
        ])
    })
}

/// Types that can be built from a raw JSON object after validation
pub trait Validate: Sized {
    /// Check the input and normalize it into `Self`
    fn validate(input: &Map<String, Value>) -> Result<Self, ValidationError>;

    /// Same as [`Validate::validate`] for an arbitrary JSON value
    ///
    /// Anything other than an object is checked as an empty object.
    fn validate_value(input: &Value) -> Result<Self, ValidationError> {
        match input {
            Value::Object(map) => Self::validate(map),
            _ => Self::validate(&Map::new()),
        }
    }
}

impl Validate for InvoiceDraft {
    fn validate(input: &Map<String, Value>) -> Result<Self, ValidationError> {
        invoice_rules().check(input)?;

        let text = |field: &str| {
            input
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let optional_text = |field: &str| {
            input
                .get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        let status = text("status").parse::<InvoiceStatus>().map_err(|_| {
            ValidationError::single("status", format!("The selected {} is invalid.", validators::label("status")))
        })?;

        let due_date = optional_text("due_date")
            .and_then(|raw| datetime::parse(&raw))
            .map(|parsed| datetime::truncate(parsed.start()));

        Ok(InvoiceDraft {
            invoice_number: text("invoice_number"),
            customer_name: text("customer_name"),
            title: text("title"),
            description: optional_text("description"),
            status,
            due_date,
        })
    }
}
