//! Axum extractor for validated payloads
//!
//! This module provides the `Validated<T>` extractor that reads a JSON body
//! and runs it through [`Validate`] before the handler is called.

use super::rules::Validate;
use crate::core::error::{ApiError, RequestError};
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde_json::Value;

/// Axum extractor that validates and normalizes a request body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_invoice(
///     State(state): State<InvoiceAppState>,
///     Validated(draft): Validated<InvoiceDraft>,
/// ) -> ApiResult<(StatusCode, Json<Invoice>)> {
///     // draft is already validated
/// }
/// ```
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Get the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = Json::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        T::validate_value(&payload)
            .map(Validated)
            .map_err(|errors| {
                tracing::debug!(%errors, "payload rejected");
                ApiError::from(errors)
            })
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => RequestError::UnsupportedMediaType.into(),
        other => RequestError::InvalidJson {
            message: other.body_text(),
        }
        .into(),
    }
}
