//! Errors raised while producing an avatar artifact.

use thiserror::Error;

use super::{FetchError, FilesystemError, RenderError, SettingsError};

/// Umbrella error for avatar production and setup.
///
/// Handlers never surface it to callers of `resolve`; it is logged and the
/// caller's default URL is returned instead.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum AvatarError {
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("failed to read {what}: {source}")]
    Io {
        what: String,
        #[source]
        source: std::io::Error,
    },

    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("cache write failed for {0}")]
    CacheWrite(String),
}

impl AvatarError {
    /// Creates an I/O error for `what`.
    #[must_use]
    pub fn io(what: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            what: what.into(),
            source,
        }
    }
}
