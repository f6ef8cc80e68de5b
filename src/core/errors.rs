//! Custom error types for translator operations

use thiserror::Error;

/// Errors surfaced by the translator client
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// Token issuance endpoint returned a non-200 status
    #[error("Authentication failed ({status}): {message}")]
    Authentication {
        status: u16,
        message: String,
    },

    /// Service rejected a request parameter
    #[error("Argument out of range: {message}")]
    ArgumentOutOfRange {
        message: String,
    },

    /// Service-side translate API failure
    #[error("Translate API error: {message}")]
    TranslateApi {
        message: String,
    },

    /// Structured service error payload
    #[error("API error: {message}")]
    Api {
        message: String,
    },

    /// Client-side precondition violated before any network call
    #[error("Validation error: {message}")]
    Validation {
        message: String,
    },

    /// Response shape matched neither a success payload nor a known error payload
    #[error("Unrecognized response: {message}")]
    Decode {
        message: String,
    },

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranslatorError {
    /// Shorthand for a client-side validation failure
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        TranslatorError::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for an unrecognized-response failure
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        TranslatorError::Decode {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for TranslatorError {
    fn from(err: anyhow::Error) -> Self {
        TranslatorError::Validation {
            message: err.to_string(),
        }
    }
}

/// Result type for translator operations
pub type Result<T> = std::result::Result<T, TranslatorError>;
