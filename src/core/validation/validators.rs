//! Reusable field validators
//!
//! Each validator receives the field name and its raw JSON value (`Null`
//! when the key is absent) and returns a human-readable message on
//! failure. Validators other than [`required`] let values of the wrong
//! JSON type through so that only the relevant rule reports.

use crate::core::datetime;
use serde_json::Value;

/// Boxed validator as stored in a rule set
pub type Validator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// "invoice_number" -> "invoice number"
pub fn label(field: &str) -> String {
    field.replace('_', " ")
}

/// Whether a value counts as "not provided"
///
/// Null, blank strings and empty arrays are all treated as missing.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Validator: field must be provided and non-blank
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if is_blank(value) {
            Err(format!("The {} field is required.", label(field)))
        } else {
            Ok(())
        }
    }
}

/// Validator: field must be a JSON string
pub fn string() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_string() {
            Ok(())
        } else {
            Err(format!("The {} field must be a string.", label(field)))
        }
    }
}

/// Validator: string must not exceed `max` characters
///
/// Length is counted in characters, not bytes.
pub fn max_chars(max: usize) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if s.chars().count() > max {
                Err(format!(
                    "The {} field must not be greater than {} characters.",
                    label(field),
                    max
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be in allowed list (exact, case-sensitive)
pub fn in_list(
    allowed: &'static [&'static str],
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_str() {
        Some(s) if allowed.contains(&s) => Ok(()),
        _ => Err(format!("The selected {} is invalid.", label(field))),
    }
}

/// Validator: string must parse as a date or date-time
pub fn date() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_str() {
        Some(s) if datetime::parse(s).is_some() => Ok(()),
        _ => Err(format!("The {} field must be a valid date.", label(field))),
    }
}
