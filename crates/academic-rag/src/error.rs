//! Error types for the RAG system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fixed answer shown to end users when the query pipeline fails.
pub const FALLBACK_ANSWER: &str =
    "I apologize, but I encountered an error processing your query. Please try again.";

/// RAG system errors
#[derive(Debug, Error)]
pub enum Error {
    /// Query was empty or whitespace-only
    #[error("Query is required")]
    InvalidQuery,

    /// The document could not be parsed
    #[error("Failed to parse '{filename}': {message}")]
    ExtractionFailed { filename: String, message: String },

    /// The document parsed but produced no usable text
    #[error("Extracted text from '{filename}' is empty. The document might be image-based or empty.")]
    EmptyDocument { filename: String },

    /// The retrieval service rejected or failed an index write
    #[error("Failed to index '{filename}': {message}")]
    IndexingFailed { filename: String, message: String },

    /// The language model call failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Chunking or service parameters are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Multipart upload could not be read or was rejected
    #[error("Upload error: {0}")]
    Upload(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an empty-document error
    pub fn empty_document(filename: impl Into<String>) -> Self {
        Self::EmptyDocument {
            filename: filename.into(),
        }
    }

    /// Create an indexing error
    pub fn indexing(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IndexingFailed {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailed(message.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Message safe to show an end user.
    ///
    /// Only `InvalidQuery` is surfaced as-is; every other failure collapses
    /// into [`FALLBACK_ANSWER`] so internal details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::InvalidQuery => "Query is required",
            _ => FALLBACK_ANSWER,
        }
    }

    /// Machine-readable error type used in JSON bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidQuery => "invalid_query",
            Error::ExtractionFailed { .. } => "extraction_failed",
            Error::EmptyDocument { .. } => "empty_document",
            Error::IndexingFailed { .. } => "indexing_failed",
            Error::GenerationFailed(_) => "generation_failed",
            Error::InvalidConfiguration(_) => "invalid_configuration",
            Error::Config(_) => "config_error",
            Error::Upload(_) => "upload_error",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
            Error::Http(_) => "http_error",
            Error::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::InvalidQuery
            | Error::ExtractionFailed { .. }
            | Error::EmptyDocument { .. }
            | Error::InvalidConfiguration(_)
            | Error::Upload(_)
            | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::IndexingFailed { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::GenerationFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internals() {
        let err = Error::generation("quota exceeded for project 1234");
        assert_eq!(err.user_message(), FALLBACK_ANSWER);
        assert!(!err.user_message().contains("quota"));

        let err = Error::indexing("a.txt", "connection refused");
        assert_eq!(err.user_message(), FALLBACK_ANSWER);
    }

    #[test]
    fn test_invalid_query_message() {
        assert_eq!(Error::InvalidQuery.user_message(), "Query is required");
        assert_eq!(Error::InvalidQuery.kind(), "invalid_query");
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(Error::empty_document("x.txt").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::indexing("x.txt", "down").status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::generation("down").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_empty_document_display_names_file() {
        let err = Error::empty_document("scan.pdf");
        assert!(err.to_string().contains("scan.pdf"));
        assert!(err.to_string().contains("image-based"));
    }
}
