//! Salted identity hashing.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::entities::{IdentityHash, RemoteHash};
use crate::domain::errors::SettingsError;
use crate::domain::ports::SettingsPort;

/// Computes identity hashes with an installation-wide salt.
///
/// The salt is resolved on first use from, in order: the explicit override,
/// the persisted value, or a freshly generated value that is then persisted.
pub struct Hasher {
    settings: Arc<dyn SettingsPort>,
    salt_override: Option<String>,
    salt: OnceCell<String>,
}

impl std::fmt::Debug for Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hasher")
            .field("salt_resolved", &self.salt.initialized())
            .finish_non_exhaustive()
    }
}

impl Hasher {
    /// Creates a hasher. Blank overrides are ignored.
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsPort>, salt_override: Option<String>) -> Self {
        Self {
            settings,
            salt_override: salt_override.filter(|salt| !salt.trim().is_empty()),
            salt: OnceCell::new(),
        }
    }

    /// Creates a hasher with a fixed salt.
    #[must_use]
    pub fn with_salt(settings: Arc<dyn SettingsPort>, salt: impl Into<String>) -> Self {
        Self::new(settings, Some(salt.into()))
    }

    /// Returns the salt, resolving it on first call.
    ///
    /// # Errors
    /// Returns error if the settings provider cannot be read, or a generated
    /// salt cannot be persisted. Nothing is cached in that case.
    pub async fn get_salt(&self) -> Result<&str, SettingsError> {
        self.salt
            .get_or_try_init(|| async {
                if let Some(salt) = &self.salt_override {
                    debug!("Using configured hashing salt");
                    return Ok(salt.clone());
                }

                if let Some(salt) = self.settings.get_salt().await?
                    && !salt.trim().is_empty()
                {
                    debug!("Using persisted hashing salt");
                    return Ok(salt);
                }

                let salt = uuid::Uuid::new_v4().simple().to_string();
                self.settings.store_salt(&salt).await?;
                info!("Generated and persisted a new hashing salt");
                Ok(salt)
            })
            .await
            .map(String::as_str)
    }

    /// Computes the local hash of `identifier`.
    ///
    /// # Errors
    /// Returns error if the salt cannot be resolved.
    pub async fn get_hash(&self, identifier: &str) -> Result<IdentityHash, SettingsError> {
        let salt = self.get_salt().await?;
        Ok(IdentityHash::compute(salt, identifier))
    }

    /// Computes the unsalted hash sent to the remote avatar service.
    #[must_use]
    pub fn get_remote_hash(&self, identifier: &str) -> RemoteHash {
        RemoteHash::compute(identifier)
    }
}
