//! Error types for the document API client

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`DocumentClient`](crate::DocumentClient) operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credentials were rejected or the authenticate response was unusable
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// The server answered 404 for the requested path
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Any other non-success status
    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: StatusCode, message: String },

    /// Transport-level failure (connect, TLS, body read)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// A response body did not match the expected JSON shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a local file for upload or writing job output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The client was configured incorrectly
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Get error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Authentication { .. } => "DOCRENDER_AUTH_FAILED",
            ApiError::NotFound { .. } => "DOCRENDER_NOT_FOUND",
            ApiError::RequestFailed { .. } => "DOCRENDER_REQUEST_FAILED",
            ApiError::HttpClient(_) => "DOCRENDER_HTTP_CLIENT_ERROR",
            ApiError::Serialization(_) => "DOCRENDER_SERIALIZATION_ERROR",
            ApiError::Io(_) => "DOCRENDER_IO_ERROR",
            ApiError::InvalidRequest { .. } => "DOCRENDER_INVALID_REQUEST",
        }
    }

    /// Check if the error came from the server rejecting the request
    pub fn is_client_error(&self) -> bool {
        match self {
            ApiError::Authentication { .. } | ApiError::NotFound { .. } => true,
            ApiError::RequestFailed { status, .. } => status.is_client_error(),
            _ => false,
        }
    }

    pub(crate) fn authentication(message: impl Into<String>) -> Self {
        ApiError::Authentication {
            message: message.into(),
        }
    }
}
