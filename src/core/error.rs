//! Typed error handling for the desk API
//!
//! Every fallible operation in the crate returns a [`DeskError`] (or one of
//! its category enums) so handlers can map failures to HTTP responses without
//! string matching.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed or incomplete request payloads
//! - [`EntityError`]: missing referenced records and uniqueness conflicts
//! - [`ConfigError`]: configuration parsing and validation
//! - [`RequestError`]: transport-level problems (headers, CSRF, ids in paths)
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get(id).await? {
//!     Some(invoice) => Ok(invoice),
//!     None => Err(EntityError::NotFound { entity_type: "invoice".into(), id }.into()),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the desk crate
#[derive(Debug, Error)]
pub enum DeskError {
    /// Request payload failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Entity lookups and uniqueness
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl DeskError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeskError::Validation(_) => StatusCode::BAD_REQUEST,
            DeskError::Entity(e) => e.status_code(),
            DeskError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DeskError::Request(e) => e.status_code(),
            DeskError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DeskError::Validation(_) => "VALIDATION_ERROR",
            DeskError::Entity(e) => e.error_code(),
            DeskError::Config(_) => "CONFIG_ERROR",
            DeskError::Request(e) => e.error_code(),
            DeskError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            DeskError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({ "entity_type": entity_type, "id": id }))
            }
            DeskError::Entity(EntityError::Conflict {
                entity_type,
                field,
                value,
            }) => Some(serde_json::json!({
                "entity_type": entity_type,
                "field": field,
                "value": value
            })),
            DeskError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            DeskError::Validation(ValidationError::FieldError { field, message }) => {
                Some(serde_json::json!({ "fields": [{ "field": field, "message": message }] }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for DeskError {
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
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Body is not JSON, or not a JSON object
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ValidationError {
    /// All field-level errors carried by this error, flattened
    pub fn fields(&self) -> Vec<FieldValidationError> {
        match self {
            ValidationError::FieldError { field, message } => {
                vec![FieldValidationError::new(field.clone(), message.clone())]
            }
            ValidationError::FieldErrors(errors) => errors.clone(),
            ValidationError::InvalidJson { .. } => Vec::new(),
        }
    }

    /// Whether `field` is among the offending fields
    pub fn has_field(&self, field: &str) -> bool {
        self.fields().iter().any(|e| e.field == field)
    }
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to stored entities
#[derive(Debug, Error)]
pub enum EntityError {
    /// Entity (or a referenced entity) was not found
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: i64 },

    /// A unique field collides with another stored entity
    #[error("{entity_type} with {field} '{value}' already exists")]
    Conflict {
        entity_type: String,
        field: String,
        value: String,
    },

    /// Storage operation failed
    #[error("Failed to {operation} {entity_type}: {message}")]
    OperationFailed {
        entity_type: String,
        operation: String,
        message: String,
    },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::Conflict { .. } => StatusCode::CONFLICT,
            EntityError::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::Conflict { .. } => "ENTITY_CONFLICT",
            EntityError::OperationFailed { .. } => "ENTITY_OPERATION_FAILED",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid configuration: {message}")]
    InvalidValue { message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    match file {
        Some(f) => format!(" file '{}'", f),
        None => String::new(),
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// Path parameter is not a valid entity id
    #[error("Invalid entity ID format: '{id}'")]
    InvalidEntityId { id: String },

    /// Missing required header
    #[error("Missing required header: {header}")]
    MissingHeader { header: String },

    /// CSRF token missing, unknown or expired
    #[error("Invalid or expired CSRF token")]
    InvalidCsrfToken,
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidEntityId { .. } => StatusCode::BAD_REQUEST,
            RequestError::MissingHeader { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidCsrfToken => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidEntityId { .. } => "INVALID_ENTITY_ID",
            RequestError::MissingHeader { .. } => "MISSING_HEADER",
            RequestError::InvalidCsrfToken => "INVALID_CSRF_TOKEN",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        DeskError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> Self {
        DeskError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for DeskError {
    fn from(err: serde_yaml::Error) -> Self {
        DeskError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<validator::ValidationErrors> for DeskError {
    fn from(err: validator::ValidationErrors) -> Self {
        DeskError::Config(ConfigError::InvalidValue {
            message: err.to_string(),
        })
    }
}

/// Convert from anyhow::Error for collaborators that report loosely typed failures
impl From<anyhow::Error> for DeskError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DeskError>() {
            Ok(desk_err) => desk_err,
            Err(other) => DeskError::Internal(other.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for desk operations
pub type DeskResult<T> = Result<T, DeskError>;
