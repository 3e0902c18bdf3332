//! Options persisted across runs.

use serde::{Deserialize, Serialize};

/// Installation options persisted next to the configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedOptions {
    /// Generated hashing salt.
    #[serde(default)]
    pub salt: Option<String>,

    /// Default audience rating, stored verbatim.
    #[serde(default)]
    pub default_rating: Option<String>,
}
