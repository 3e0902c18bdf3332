//! Settings provider error types.

use thiserror::Error;

/// Settings persistence error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    ReadFailed(String),

    #[error("failed to store settings: {0}")]
    StoreFailed(String),
}
