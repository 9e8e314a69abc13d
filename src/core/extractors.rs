//! Axum extractors for record identifiers and request bodies
//!
//! Both reject with an [`ApiError`], so a malformed id or body is answered
//! with the uniform `{status, message}` shape before a handler runs.

use crate::core::entity::RecordKey;
use crate::core::error::{ApiError, ValidationError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

/// Check that a raw path segment has the shape of a record key
pub fn parse_record_key(raw: &str) -> Result<RecordKey, ApiError> {
    raw.parse::<RecordKey>()
        .map_err(|_| ApiError::invalid_id(raw))
}

/// IdShapeCheck: the `{id}` path segment, parsed as a record key
///
/// ```rust,ignore
/// async fn get_booking(RecordId(id): RecordId) -> ApiResult<Json<Value>> { ... }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub RecordKey);

impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_field("id", e.body_text()))?;
        parse_record_key(&raw).map(RecordId)
    }
}

/// JSON body whose parse failures surface as [`ValidationError::InvalidJson`]
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(ValidationError::InvalidJson {
        message: rejection.body_text(),
    })
}
