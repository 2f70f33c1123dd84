/*!
 * Error types for the rpgtl application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Only `AppError` and `DocumentError` ever reach the file level. The rest are
 * carried inside per-unit outcomes and end up in the anomaly log.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Map a non-success HTTP status to the closest provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Malformed command node. Logged and skipped, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaAnomaly {
    /// A choice answer (402) without exactly two parameters
    #[error("choice answer expects 2 parameters, found {found}")]
    AnswerArity { found: usize },

    /// A choice answer whose label is empty or missing
    #[error("choice answer has an empty label")]
    EmptyAnswer,

    /// An empty entry inside a choice list (102)
    #[error("choice list entry {index} is empty")]
    EmptyChoice { index: usize },

    /// A choice list entry that is not a string
    #[error("choice list entry {index} is not a string")]
    NonStringChoice { index: usize },

    /// A plain text node (401) whose first parameter is not a string
    #[error("plain text parameter is not a string")]
    NonStringText,
}

/// Reasons a translated paragraph could not be wrapped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReflowError {
    /// The configured width cannot hold a single character
    #[error("maximum line width must be greater than zero")]
    ZeroWidth,

    /// Nothing to wrap after trimming
    #[error("text has no words to wrap")]
    EmptyInput,
}

/// Errors raised when a document does not have the expected root shape
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The root (or a required field) has the wrong JSON type
    #[error("unexpected document shape: expected {expected} at {location}")]
    UnexpectedShape {
        /// What the walker was looking for
        expected: &'static str,
        /// Where in the document it looked
        location: String,
    },

    /// The file is recognised but holds nothing translatable
    #[error("unsupported document: {0}")]
    Unsupported(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document traversal
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::File(error.to_string())
    }
}
