//! Typed error handling for the invoice API
//!
//! Handlers return [`ApiError`] so that every failure path maps onto a
//! distinct HTTP response instead of a generic `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`EntityError`]: a requested record does not exist
//! - [`ValidationError`]: client input failed the validation rules (422)
//! - [`RequestError`]: the request could not be read at all (400/415)
//! - [`StorageError`]: the backing store failed (500)
//!
//! # Example
//!
//! ```rust,ignore
//! use invoice_api::prelude::*;
//!
//! async fn fetch(repo: &dyn InvoiceRepository, id: i64) -> ApiResult<Invoice> {
//!     repo.find_by_id(id).await?.ok_or_else(|| EntityError::not_found::<Invoice>(id).into())
//! }
//! ```

use crate::core::entity::Entity;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// The main error type for the API boundary
#[derive(Debug)]
pub enum ApiError {
    /// Record lookup errors
    Entity(EntityError),

    /// Field validation errors
    Validation(ValidationError),

    /// The request body or query could not be read
    Request(RequestError),

    /// Storage backend errors
    Storage(StorageError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Entity(e) => write!(f, "{}", e),
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Request(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Entity(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            ApiError::Request(e) => Some(e),
            ApiError::Storage(e) => Some(e),
            ApiError::Internal(_) => None,
        }
    }
}

/// Error body returned to HTTP clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
    /// Per-field messages, only present for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Entity(e) => e.status_code(),
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Request(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to an error response
    ///
    /// Server-side failures are reported with a generic message; the
    /// details only go to the log.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(e) => ErrorResponse {
                message: e.message().to_string(),
                errors: Some(e.errors().clone()),
            },
            ApiError::Storage(_) | ApiError::Internal(_) => ErrorResponse {
                message: "Server Error".to_string(),
                errors: None,
            },
            _ => ErrorResponse {
                message: self.to_string(),
                errors: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record lookup
#[derive(Debug)]
pub enum EntityError {
    /// No record with this id exists
    NotFound { entity_type: String, id: String },
}

impl EntityError {
    /// Not-found error for an entity type and the id that was requested
    pub fn not_found<T: Entity>(id: impl fmt::Display) -> Self {
        EntityError::NotFound {
            entity_type: T::resource_name_singular().to_string(),
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        ApiError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Per-field validation messages, in the order fields were checked
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// Top-level message attached to every validation failure
pub const VALIDATION_MESSAGE: &str = "The given data was invalid.";

/// A collection of field validation failures
///
/// Failures are accumulated rather than short-circuited so that clients
/// see every problem in a single response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    errors: FieldErrors,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Single-field failure
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add(field, message);
        err
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Messages recorded for one field
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn message(&self) -> &'static str {
        VALIDATION_MESSAGE
    }

    /// `Ok(value)` when nothing was recorded, `Err(self)` otherwise
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self
            .errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "Validation errors: {}", msgs.join(", "))
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors raised before a request reaches validation
#[derive(Debug)]
pub enum RequestError {
    /// The body is not well-formed JSON
    InvalidJson { message: String },

    /// The body was not sent as `application/json`
    UnsupportedMediaType,
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
            RequestError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidJson { message } => write!(f, "Invalid JSON: {}", message),
            RequestError::UnsupportedMediaType => {
                write!(f, "Expected request with `Content-Type: application/json`")
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::Request(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Connection error
    ConnectionError { backend: String, message: String },

    /// Query execution error
    QueryError { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError { message } => write!(f, "Storage error: {}", message),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

/// Repository failures surface as storage errors
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Storage(StorageError::QueryError {
            message: format!("{:#}", err),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for handler operations
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Tests
// =============================================================================
