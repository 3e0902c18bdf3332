//! Remote fetch error types.

use thiserror::Error;

/// Failures of an outbound image request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("failed to create HTTP client: {message}")]
    Client { message: String },

    #[error("request failed: {message}")]
    Request { message: String },

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("response body is empty")]
    EmptyBody,

    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("unexpected content type: {content_type}")]
    NotAnImage { content_type: String },

    #[error("invalid URL: {message}")]
    InvalidUrl { message: String },
}

impl FetchError {
    /// Creates a request error.
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }

    /// Returns whether the remote side answered with "no such avatar".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404 })
    }
}
