//! Axum extractor for validated DTOs
//!
//! This module provides the `Validated<D>` extractor that runs a DTO builder
//! over the JSON body before the handler sees it.

use axum::{
    Json,
    extract::{FromRef, FromRequest, Request},
};
use serde_json::Value;

use crate::core::error::{DeskError, ValidationError};
use crate::core::field::{FieldReader, SpellingPolicy};

/// Trait for DTOs that can be built from a loosely-shaped request body
pub trait FromPayload: Sized {
    /// Name used in logs
    const NAME: &'static str;

    /// Read every field, recording problems on the reader
    ///
    /// Implementations always return a value; the caller discards it if the
    /// reader collected errors.
    fn read(reader: &mut FieldReader<'_>) -> Self;

    /// Build the DTO, failing with every field error at once
    fn from_payload(payload: &Value, policy: SpellingPolicy) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::from_value(payload, policy)?;
        let dto = Self::read(&mut reader);
        reader.finish(dto)
    }
}

/// Axum extractor that builds a DTO from the request body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_invoice(
///     State(state): State<AppState>,
///     Validated(dto): Validated<CreateInvoice>,
/// ) -> DeskResult<Json<InvoiceResponse>> {
///     // dto is already normalized and defaulted
/// }
/// ```
pub struct Validated<D>(pub D);

impl<D> Validated<D> {
    /// Get the inner DTO
    pub fn into_inner(self) -> D {
        self.0
    }
}

impl<D> std::ops::Deref for Validated<D> {
    type Target = D;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, D> FromRequest<S> for Validated<D>
where
    S: Send + Sync,
    D: FromPayload,
    SpellingPolicy: FromRef<S>,
{
    type Rejection = DeskError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> =
            Json::from_request(req, state)
                .await
                .map_err(|e| ValidationError::InvalidJson {
                    message: e.body_text(),
                })?;

        let policy = SpellingPolicy::from_ref(state);
        match D::from_payload(&payload, policy) {
            Ok(dto) => {
                tracing::debug!(dto = D::NAME, "payload accepted");
                Ok(Validated(dto))
            }
            Err(err) => {
                tracing::debug!(dto = D::NAME, error = %err, "payload rejected");
                Err(err.into())
            }
        }
    }
}
