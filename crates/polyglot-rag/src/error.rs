//! Error types for the Q&A service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upload is not an accepted document type
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Upload exceeds the configured size cap
    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Text extraction failed; the document was not registered
    #[error("Failed to extract text from '{filename}': {message}")]
    ExtractionFailed { filename: String, message: String },

    /// The completion capability could not produce an answer
    #[error("Completion unavailable: {0}")]
    Completion(CompletionFailure),

    /// Translation call failed
    #[error("Translation failed: {0}")]
    Translation(String),

    /// Language detection call failed
    #[error("Language detection failed: {0}")]
    Detection(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a translation error
    pub fn translation(message: impl Into<String>) -> Self {
        Self::Translation(message.into())
    }

    /// Create a detection error
    pub fn detection(message: impl Into<String>) -> Self {
        Self::Detection(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<CompletionFailure> for Error {
    fn from(failure: CompletionFailure) -> Self {
        Error::Completion(failure)
    }
}

/// Classified failure of the completion capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionFailure {
    /// No credential configured
    #[error("no API key configured")]
    MissingCredential,

    /// Credential rejected by the provider
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Provider rate limit hit
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Call exceeded its deadline
    #[error("request timed out")]
    Timeout,

    /// Anything the provider reported that is not classified above
    #[error("{0}")]
    Other(String),
}

/// What the caller should make of a completion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Credential missing or invalid; retrying will not help
    Misconfigured,
    /// Try again later
    RateLimited,
    /// Transient failure
    Transient,
}

impl CompletionFailure {
    /// Map the failure onto its user-facing category
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::MissingCredential | Self::Authentication(_) => FailureCategory::Misconfigured,
            Self::RateLimited(_) => FailureCategory::RateLimited,
            Self::Network(_) | Self::Timeout | Self::Other(_) => FailureCategory::Transient,
        }
    }

    /// Classify an arbitrary crate error raised while calling the provider
    pub fn from_error(err: Error) -> Self {
        match err {
            Error::Completion(failure) => failure,
            Error::Http(e) if e.is_timeout() => Self::Timeout,
            Error::Http(e) if e.is_connect() || e.is_request() => Self::Network(e.to_string()),
            other => Self::Other(other.to_string()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match &self {
            Error::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone(), None)
            }
            Error::UnsupportedMediaType(mime) => (
                StatusCode::BAD_REQUEST,
                "unsupported_media_type",
                format!("Only PDF files are allowed (got {})", mime),
                None,
            ),
            Error::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                self.to_string(),
                None,
            ),
            Error::DocumentNotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Document not found: {}", id),
                None,
            ),
            Error::ExtractionFailed { filename, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "extraction_failed",
                format!("Failed to process '{}'", filename),
                Some(message.clone()),
            ),
            Error::Completion(failure) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "completion_unavailable",
                failure.to_string(),
                None,
            ),
            Error::Translation(msg) => {
                (StatusCode::BAD_GATEWAY, "translation_error", msg.clone(), None)
            }
            Error::Detection(msg) => {
                (StatusCode::BAD_GATEWAY, "detection_error", msg.clone(), None)
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
                None,
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string(), None),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string(), None),
            Error::Config(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone(), None)
            }
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone(), None)
            }
        };

        let mut error = json!({
            "type": error_type,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = json!(details);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
