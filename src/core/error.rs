//! Typed error handling for the bookings service
//!
//! Every failure a request can meet is one of four categories, and each
//! category maps to exactly one HTTP status:
//!
//! - [`ValidationError`]: malformed body, bad list parameters, constraint
//!   violations (400)
//! - [`RequestError`]: identifier fails its shape check (400), missing or
//!   rejected credential (401), no matching route (404)
//! - [`EntityError`]: well-formed identifier with no matching record (404)
//! - [`StorageError`]: the record store refused or failed the call (400,
//!   carrying the store's message)
//!
//! At the HTTP boundary every [`ApiError`] renders as `{status, message}`.
//!
//! # Example
//!
//! ```rust,ignore
//! let booking = store
//!     .find_by_id(id)
//!     .await?
//!     .ok_or_else(|| ApiError::not_found("booking", id))?;
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The crate-wide error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input did not satisfy the resource's constraints
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request itself was malformed or unauthenticated
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Entity lookup failures
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Underlying persistence failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Uniform error body returned by every route
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// Human-readable message
    pub message: String,
}

impl ApiError {
    /// Shorthand for [`EntityError::NotFound`]
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        ApiError::Entity(EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }

    /// Shorthand for [`RequestError::InvalidIdentifier`]
    pub fn invalid_id(id: impl Into<String>) -> Self {
        ApiError::Request(RequestError::InvalidIdentifier { id: id.into() })
    }

    /// Shorthand for [`RequestError::Unauthorized`]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Request(RequestError::Unauthorized {
            message: message.into(),
        })
    }

    /// Shorthand for [`RequestError::RouteNotFound`]
    pub fn no_route(method: impl ToString, path: impl Into<String>) -> Self {
        ApiError::Request(RequestError::RouteNotFound {
            method: method.to_string(),
            path: path.into(),
        })
    }

    /// Shorthand for a single-field [`ValidationError`]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        })
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Request(e) => e.status_code(),
            ApiError::Entity(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Convert to the wire representation
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status_code().as_u16(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation failure
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation errors: {}", join_fields(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Body could not be parsed
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Sort field not in the resource's sortable set
    #[error("Cannot sort {resource} by '{field}'")]
    UnknownSortField { resource: String, field: String },
}

fn join_fields(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        // field_errors() is backed by a HashMap
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors raised by the request gate
#[derive(Debug, Error)]
pub enum RequestError {
    /// Path identifier failed the store's id-shape check
    #[error("Id {id} is not valid")]
    InvalidIdentifier { id: String },

    /// Missing or rejected bearer credential
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// No route matches the request path
    #[error("No route for {method} {path}")]
    RouteNotFound { method: String, path: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity lookups
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: String, id: String },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors surfaced by record stores
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store rejected or failed the operation
    #[error("{message}")]
    QueryError { message: String },
}

/// Store failures become [`StorageError`]; a [`ValidationError`] raised
/// inside a store (record invariants checked under its write lock) keeps its
/// category.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ValidationError>() {
            Ok(validation) => ApiError::Validation(validation),
            Err(err) => ApiError::Storage(StorageError::QueryError {
                message: err.to_string(),
            }),
        }
    }
}

/// A specialized Result type for service operations
pub type ApiResult<T> = Result<T, ApiError>;
