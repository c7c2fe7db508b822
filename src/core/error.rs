//! Typed error handling for rest-extra
//!
//! Every helper in this crate reports failures through [`ExtraError`], which
//! maps each category onto an HTTP status code and a stable error code so
//! handlers can return it directly.
//!
//! # Error Categories
//!
//! - [`FilterError`]: rejected `filter` / `cond` / `distinct` query parameters
//! - [`FieldError`]: undecodable file fields
//! - [`ValidationError`]: structured input validation (translations, JSON bodies)
//! - [`ConfigError`]: endpoint configuration parsing and validation
//! - [`RequestError`]: query-string, routing, pagination and permission failures
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_extra::prelude::*;
//!
//! async fn list(FilterQuery(params): FilterQuery) -> Result<Json<Vec<Value>>, ExtraError> {
//!     let view = resolver.resolve(&params, &collection)?;
//!     Ok(Json(view.to_vec()))
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for rest-extra
#[derive(Debug)]
pub enum ExtraError {
    /// Filter request errors
    Filter(FilterError),

    /// File field decoding errors
    Field(FieldError),

    /// Input validation errors
    Validation(ValidationError),

    /// Configuration errors
    Config(ConfigError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ExtraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtraError::Filter(e) => write!(f, "{}", e),
            ExtraError::Field(e) => write!(f, "{}", e),
            ExtraError::Validation(e) => write!(f, "{}", e),
            ExtraError::Config(e) => write!(f, "{}", e),
            ExtraError::Request(e) => write!(f, "{}", e),
            ExtraError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ExtraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtraError::Filter(e) => Some(e),
            ExtraError::Field(e) => Some(e),
            ExtraError::Validation(e) => Some(e),
            ExtraError::Config(e) => Some(e),
            ExtraError::Request(e) => Some(e),
            ExtraError::Internal(_) => None,
        }
    }
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

impl ExtraError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtraError::Filter(_) => StatusCode::BAD_REQUEST,
            ExtraError::Field(_) => StatusCode::BAD_REQUEST,
            ExtraError::Validation(_) => StatusCode::BAD_REQUEST,
            ExtraError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ExtraError::Request(e) => e.status_code(),
            ExtraError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ExtraError::Filter(_) => "BAD_FILTER_REQUEST",
            ExtraError::Field(e) => e.error_code(),
            ExtraError::Validation(_) => "VALIDATION_ERROR",
            ExtraError::Config(_) => "CONFIG_ERROR",
            ExtraError::Request(e) => e.error_code(),
            ExtraError::Internal(_) => "INTERNAL_ERROR",
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
            ExtraError::Filter(FilterError::MissingRequiredField { missing }) => {
                Some(serde_json::json!({
                    "reason": "missing_required_field",
                    "missing": missing
                }))
            }
            ExtraError::Filter(e) => Some(serde_json::json!({ "reason": e.reason() })),
            ExtraError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ExtraError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "request rejected");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Filter Errors
// =============================================================================

/// Errors raised while resolving filter query parameters
///
/// All variants are caller input errors and surface as a single
/// `BAD_FILTER_REQUEST` category.
#[derive(Debug)]
pub enum FilterError {
    /// `cond` is neither `and` nor `or`
    InvalidCondition { value: String },

    /// A `filter` parameter is not a JSON object
    MalformedExpression { index: usize, message: String },

    /// Required filter fields were not supplied
    MissingRequiredField { missing: Vec<String> },

    /// The collection rejected the constraint (unknown field, type mismatch)
    FilterEvaluation {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl FilterError {
    /// Wrap a collection error
    pub fn evaluation(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        FilterError::FilterEvaluation {
            source: Box::new(err),
        }
    }

    /// Short machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            FilterError::InvalidCondition { .. } => "invalid_condition",
            FilterError::MalformedExpression { .. } => "malformed_expression",
            FilterError::MissingRequiredField { .. } => "missing_required_field",
            FilterError::FilterEvaluation { .. } => "filter_evaluation",
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::InvalidCondition { value } => {
                write!(f, "Invalid filter condition '{}': expected 'and' or 'or'", value)
            }
            FilterError::MalformedExpression { index, message } => {
                write!(f, "Malformed filter expression #{}: {}", index, message)
            }
            FilterError::MissingRequiredField { missing } => {
                write!(f, "Filter field(s) {} is required.", missing.join(", "))
            }
            FilterError::FilterEvaluation { source } => {
                write!(f, "Invalid filter: {}", source)
            }
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::FilterEvaluation { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<FilterError> for ExtraError {
    fn from(err: FilterError) -> Self {
        ExtraError::Filter(err)
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Errors related to encoded file fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Payload is not valid base64
    InvalidFile { message: String },

    /// Decoded content is not one of the allowed file types
    InvalidFileType { detected: Option<String> },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::InvalidFile { message } => write!(f, "Invalid file: {}", message),
            FieldError::InvalidFileType { detected: Some(ext) } => {
                write!(f, "Invalid file type: {}", ext)
            }
            FieldError::InvalidFileType { detected: None } => {
                write!(f, "Invalid file type: unrecognized content")
            }
        }
    }
}

impl std::error::Error for FieldError {}

impl FieldError {
    pub fn error_code(&self) -> &'static str {
        match self {
            FieldError::InvalidFile { .. } => "INVALID_FILE",
            FieldError::InvalidFileType { .. } => "INVALID_FILE_TYPE",
        }
    }
}

impl From<FieldError> for ExtraError {
    fn from(err: FieldError) -> Self {
        ExtraError::Field(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Input is not a JSON object
    NotAnObject { field: String },

    /// Input may not be empty
    Empty { field: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotAnObject { field } => {
                write!(f, "Field '{}': input is not a valid dict.", field)
            }
            ValidationError::Empty { field } => {
                write!(f, "Field '{}': this field may not be empty.", field)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ExtraError {
    fn from(err: ValidationError) -> Self {
        ExtraError::Validation(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Two endpoints share a name
    DuplicateEndpoint { name: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::DuplicateEndpoint { name } => {
                write!(f, "Endpoint '{}' is configured more than once", name)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ExtraError {
    fn from(err: ConfigError) -> Self {
        ExtraError::Config(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Query string could not be deserialized
    InvalidQuery { message: String },

    /// Requested page does not exist
    InvalidPage { page: String },

    /// No route matches the path
    RouteNotFound { path: String },

    /// Unauthorized request
    Unauthorized { message: String },

    /// Forbidden operation
    Forbidden { message: String },

    /// Method not allowed
    MethodNotAllowed { method: String, path: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidQuery { message } => {
                write!(f, "Invalid query string: {}", message)
            }
            RequestError::InvalidPage { page } => write!(f, "Invalid page '{}'", page),
            RequestError::RouteNotFound { path } => write!(f, "No route matches '{}'", path),
            RequestError::Unauthorized { message } => {
                write!(f, "Unauthorized: {}", message)
            }
            RequestError::Forbidden { message } => {
                write!(f, "Forbidden: {}", message)
            }
            RequestError::MethodNotAllowed { method, path } => {
                write!(f, "Method {} not allowed on {}", method, path)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidPage { .. } => StatusCode::NOT_FOUND,
            RequestError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RequestError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
            RequestError::InvalidPage { .. } => "INVALID_PAGE",
            RequestError::RouteNotFound { .. } => "ROUTE_NOT_FOUND",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
            RequestError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
        }
    }
}

impl From<RequestError> for ExtraError {
    fn from(err: RequestError) -> Self {
        ExtraError::Request(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ExtraError {
    fn from(err: serde_json::Error) -> Self {
        ExtraError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for ExtraError {
    fn from(err: std::io::Error) -> Self {
        ExtraError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ExtraError {
    fn from(err: serde_yaml::Error) -> Self {
        ExtraError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for ExtraError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ConfigError>() {
            Ok(config_err) => ExtraError::Config(config_err),
            Err(err) => ExtraError::Internal(err.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for rest-extra operations
pub type ExtraResult<T> = Result<T, ExtraError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_errors_share_one_category() {
        let errors: Vec<ExtraError> = vec![
            FilterError::InvalidCondition {
                value: "xor".to_string(),
            }
            .into(),
            FilterError::MalformedExpression {
                index: 0,
                message: "EOF".to_string(),
            }
            .into(),
            FilterError::MissingRequiredField {
                missing: vec!["status".to_string()],
            }
            .into(),
            FilterError::evaluation(std::fmt::Error).into(),
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.error_code(), "BAD_FILTER_REQUEST");
        }
    }

    #[test]
    fn test_missing_required_field_display() {
        let err = FilterError::MissingRequiredField {
            missing: vec!["status".to_string(), "owner".to_string()],
        };
        assert_eq!(err.to_string(), "Filter field(s) status, owner is required.");
    }

    #[test]
    fn test_missing_required_field_details() {
        let err = ExtraError::from(FilterError::MissingRequiredField {
            missing: vec!["status".to_string()],
        });
        let response = err.to_response();
        let details = response.details.expect("details should be present");
        assert_eq!(details["missing"], serde_json::json!(["status"]));
        assert_eq!(details["reason"], "missing_required_field");
    }

    #[test]
    fn test_filter_evaluation_keeps_source() {
        use std::error::Error;

        let err = FilterError::evaluation(std::fmt::Error);
        assert!(err.source().is_some());
        assert_eq!(err.reason(), "filter_evaluation");
    }

    #[test]
    fn test_field_error_codes() {
        let err = ExtraError::from(FieldError::InvalidFileType {
            detected: Some("gif".to_string()),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_FILE_TYPE");
        assert_eq!(err.to_string(), "Invalid file type: gif");
    }

    #[test]
    fn test_validation_error_multiple_fields() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError::new("translations.en.title", "unknown field"),
            FieldValidationError::new("translations.fr", "expected an object"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("translations.en.title"));
        assert!(msg.contains("translations.fr"));
    }

    #[test]
    fn test_request_error_status_codes() {
        let cases = vec![
            (
                RequestError::InvalidQuery {
                    message: "x".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                RequestError::InvalidPage {
                    page: "9".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                RequestError::Forbidden {
                    message: "x".to_string(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                RequestError::MethodNotAllowed {
                    method: "PATCH".to_string(),
                    path: "/items".to_string(),
                },
                StatusCode::METHOD_NOT_ALLOWED,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn test_error_response_serialization() {
        let err = ExtraError::from(FilterError::InvalidCondition {
            value: "xor".to_string(),
        });
        let json = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(json["code"], "BAD_FILTER_REQUEST");
        assert_eq!(json["details"]["reason"], "invalid_condition");
    }

    #[test]
    fn test_anyhow_config_error_is_preserved() {
        let err: ExtraError = anyhow::Error::new(ConfigError::DuplicateEndpoint {
            name: "items".to_string(),
        })
        .into();
        assert!(matches!(
            err,
            ExtraError::Config(ConfigError::DuplicateEndpoint { .. })
        ));
    }
}
