//! Error handling for ConnectHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy for both the HTTP server
//! and the typed client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Main error type for ConnectHub application
#[derive(Error, Debug)]
pub enum ConnectHubError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for ConnectHub operations
pub type Result<T> = std::result::Result<T, ConnectHubError>;

impl From<ValidationErrors> for ConnectHubError {
    fn from(errors: ValidationErrors) -> Self {
        ConnectHubError::Validation(errors)
    }
}

impl From<config::ConfigError> for ConnectHubError {
    fn from(error: config::ConfigError) -> Self {
        ConnectHubError::Config(error.to_string())
    }
}

/// Coarse error taxonomy shown to users: either the form was wrong, or the
/// request could not be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    RateLimited,
    Network,
    Server,
}

impl ConnectHubError {
    /// Shorthand for a missing record
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        ConnectHubError::NotFound { resource, id: id.to_string() }
    }

    /// Classify the error for user-facing reporting
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConnectHubError::Validation(_) | ConnectHubError::InvalidInput(_) | ConnectHubError::Upload(_) => {
                ErrorKind::Validation
            }
            ConnectHubError::NotFound { .. } => ErrorKind::NotFound,
            ConnectHubError::Authentication(_) | ConnectHubError::Token(_) => ErrorKind::Unauthorized,
            ConnectHubError::PermissionDenied(_) => ErrorKind::Forbidden,
            ConnectHubError::InvalidStateTransition { .. } => ErrorKind::Conflict,
            ConnectHubError::RateLimitExceeded => ErrorKind::RateLimited,
            ConnectHubError::Http(_) | ConnectHubError::ServiceUnavailable(_) => ErrorKind::Network,
            ConnectHubError::Api { status, .. } => match *status {
                400 | 422 => ErrorKind::Validation,
                401 => ErrorKind::Unauthorized,
                403 => ErrorKind::Forbidden,
                404 => ErrorKind::NotFound,
                409 => ErrorKind::Conflict,
                429 => ErrorKind::RateLimited,
                _ => ErrorKind::Server,
            },
            _ => ErrorKind::Server,
        }
    }

    /// Whether the error came from the form rather than the backend
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ConnectHubError::Database(_) => false,
            ConnectHubError::Migration(_) => false,
            ConnectHubError::Config(_) => false,
            ConnectHubError::Validation(_) => true,
            ConnectHubError::NotFound { .. } => false,
            ConnectHubError::PermissionDenied(_) => false,
            ConnectHubError::Authentication(_) => false,
            ConnectHubError::InvalidStateTransition { .. } => false,
            ConnectHubError::Redis(_) => true,
            ConnectHubError::Http(_) => true,
            ConnectHubError::Api { status, .. } => *status >= 500 || *status == 429,
            ConnectHubError::Token(_) => false,
            ConnectHubError::Serialization(_) => false,
            ConnectHubError::Io(_) => true,
            ConnectHubError::UrlParse(_) => false,
            ConnectHubError::Upload(_) => true,
            ConnectHubError::RateLimitExceeded => true,
            ConnectHubError::InvalidInput(_) => true,
            ConnectHubError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ConnectHubError::Database(_) => ErrorSeverity::Critical,
            ConnectHubError::Migration(_) => ErrorSeverity::Critical,
            ConnectHubError::Config(_) => ErrorSeverity::Critical,
            ConnectHubError::PermissionDenied(_) => ErrorSeverity::Warning,
            ConnectHubError::Authentication(_) => ErrorSeverity::Warning,
            ConnectHubError::Token(_) => ErrorSeverity::Warning,
            ConnectHubError::RateLimitExceeded => ErrorSeverity::Warning,
            ConnectHubError::Validation(_) => ErrorSeverity::Info,
            ConnectHubError::InvalidInput(_) | ConnectHubError::Upload(_) => ErrorSeverity::Info,
            ConnectHubError::NotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status used when this error leaves the server
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => match self {
                ConnectHubError::InvalidInput(_) | ConnectHubError::Upload(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Network => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to a site visitor
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Server => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Error body returned by the HTTP API
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
}

impl IntoResponse for ConnectHubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, severity = %self.severity(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let fields = match &self {
            ConnectHubError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };
        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                kind: self.kind(),
                message: self.public_message(),
                fields,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrors;

    #[test]
    fn test_validation_maps_to_unprocessable_entity() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "Title is required");
        let err = ConnectHubError::from(errors);

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.severity(), ErrorSeverity::Info);
        assert!(err.is_validation());
    }

    #[test]
    fn test_api_status_classification() {
        let err = ConnectHubError::Api { status: 422, message: "bad".to_string() };
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = ConnectHubError::Api { status: 503, message: "down".to_string() };
        assert_eq!(err.kind(), ErrorKind::Server);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = ConnectHubError::Config("secret path".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");

        let err = ConnectHubError::not_found("hero image", 7);
        assert_eq!(err.public_message(), "hero image not found: 7");
    }
}
