//! Image rendering error types.

use thiserror::Error;

use crate::domain::entities::ImageFormat;

/// Failures while generating, decoding or encoding an image.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum RenderError {
    #[error("invalid size: {size}")]
    InvalidSize { size: u32 },

    #[error("failed to decode image: {message}")]
    Decode { message: String },

    #[error("failed to encode {format} image: {message}")]
    Encode {
        format: ImageFormat,
        message: String,
    },

    #[error("{format} cannot be produced from a bitmap")]
    Unsupported { format: ImageFormat },

    #[error("render task failed: {message}")]
    Task { message: String },
}

impl RenderError {
    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an encode error.
    #[must_use]
    pub fn encode(format: ImageFormat, message: impl Into<String>) -> Self {
        Self::Encode {
            format,
            message: message.into(),
        }
    }
}
