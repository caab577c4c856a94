// src/error.rs

//! Unified error handling for the extractor.
//!
//! Fetching, parsing and extraction each get their own error type so callers
//! can tell a bad status code from an unreadable body. `AppError` wraps all of
//! them for the pipeline and the CLI.

use std::fmt;

use thiserror::Error;

use crate::models::Category;

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure while retrieving a page over HTTP.
#[derive(Error, Debug)]
pub enum FetchError {
    /// URL is not an absolute http/https URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection could not be established or broke mid-transfer
    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout
    #[error("Request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with something other than 200 OK
    #[error("{url} returned HTTP status {status}")]
    Status { url: String, status: u16 },

    /// Body is larger than the configured limit
    #[error("Response body from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },
}

impl FetchError {
    /// Classify a transport error, keeping timeouts distinct.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url, source }
        } else {
            Self::Network { url, source }
        }
    }

    /// HTTP status code, if the failure was a bad status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Raw bytes could not be turned into a document tree.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Body is not decodable text
    #[error("Cannot decode document from {source_name} (declared charset: {}): {error}", .charset.as_deref().unwrap_or("none"))]
    Undecodable {
        source_name: String,
        charset: Option<String>,
        #[source]
        error: std::str::Utf8Error,
    },
}

/// Failure of one extraction call.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Document could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// One of the per-category collection tasks failed
    #[error("Collecting <{category}> failed: {message}")]
    Task { category: Category, message: String },

    /// The caller cancelled before all categories were collected
    #[error("Extraction cancelled")]
    Cancelled,

    /// The task runtime lost a collection task
    #[error("Collection task was lost: {0}")]
    Join(String),
}

impl ExtractError {
    /// Create a task error for a category.
    pub fn task(category: Category, message: impl fmt::Display) -> Self {
        Self::Task {
            category,
            message: message.to_string(),
        }
    }

    /// Category that failed, if this is a task error.
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Task { category, .. } => Some(*category),
            _ => None,
        }
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Page retrieval failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Parsing or extraction failed
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration value out of range
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the failure came from caller cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Extract(ExtractError::Cancelled))
    }
}

impl From<ParseError> for AppError {
    fn from(error: ParseError) -> Self {
        Self::Extract(ExtractError::Parse(error))
    }
}
