//! Filesystem cache error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the file cache from operating at all.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// The cache root could not be created.
    #[error("failed to create cache directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The cache root exists but is not a directory.
    #[error("cache root is not a directory: {}", path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },
}

impl FilesystemError {
    /// Creates a directory creation error.
    #[must_use]
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }
}
