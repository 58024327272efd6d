//! Error handling for the AquaFlow client

use std::fmt;
use thiserror::Error;

/// Unified error type for the AquaFlow client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors, including timeouts
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A non-success response from the API
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The server rejected the request's credentials (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Client-side input validation failure; no request was issued
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation was cancelled before it completed.
    ///
    /// Cancellation is an expected outcome during logout or teardown and
    /// is never surfaced to the user.
    #[error("Operation cancelled")]
    Cancelled,

    /// Local session-store read/write errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new API error from a status code and response body
    pub fn api<T: fmt::Display>(status: u16, message: T) -> Self {
        Error::Api {
            status,
            message: message.to_string(),
        }
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// Whether this error is an intentional cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Whether this error is an authentication rejection (401)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }
}
