//! File-backed [`SettingsPort`].

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::options::PersistedOptions;
use super::storage::{ConfigError, StorageManager};
use crate::domain::errors::SettingsError;
use crate::domain::ports::SettingsPort;

/// Keeps [`PersistedOptions`] in memory and writes them through on change.
#[derive(Debug)]
pub struct FileSettingsStore {
    storage: StorageManager,
    options: Mutex<PersistedOptions>,
    default_rating: String,
}

impl FileSettingsStore {
    /// Loads the options file, using `fallback_rating` when it stores no rating.
    ///
    /// # Errors
    /// Returns `ConfigError` if the options file cannot be read.
    pub fn open(storage: StorageManager, fallback_rating: &str) -> Result<Self, ConfigError> {
        let options = storage.load_options()?;
        let default_rating = options
            .default_rating
            .clone()
            .unwrap_or_else(|| fallback_rating.to_string());

        Ok(Self {
            storage,
            options: Mutex::new(options),
            default_rating,
        })
    }
}

#[async_trait]
impl SettingsPort for FileSettingsStore {
    async fn get_salt(&self) -> Result<Option<String>, SettingsError> {
        Ok(self.options.lock().await.salt.clone())
    }

    async fn store_salt(&self, salt: &str) -> Result<(), SettingsError> {
        let mut options = self.options.lock().await;
        let mut updated = options.clone();
        updated.salt = Some(salt.to_string());

        let storage = self.storage.clone();
        let to_save = updated.clone();
        tokio::task::spawn_blocking(move || storage.save_options(&to_save))
            .await
            .map_err(|e| SettingsError::StoreFailed(e.to_string()))?
            .map_err(|e| SettingsError::StoreFailed(e.to_string()))?;

        debug!(path = %self.storage.config_dir().display(), "Persisted hashing salt");
        *options = updated;
        Ok(())
    }

    fn default_rating(&self) -> String {
        self.default_rating.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_salt_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let store =
            FileSettingsStore::open(StorageManager::with_dir(dir.path().to_path_buf()), "g")
                .unwrap();

        assert_eq!(store.get_salt().await.unwrap(), None);
        store.store_salt("s3cret").await.unwrap();
        assert_eq!(store.get_salt().await.unwrap().as_deref(), Some("s3cret"));

        let reopened =
            FileSettingsStore::open(StorageManager::with_dir(dir.path().to_path_buf()), "g")
                .unwrap();
        assert_eq!(reopened.get_salt().await.unwrap().as_deref(), Some("s3cret"));
    }

    #[tokio::test]
    async fn test_default_rating_precedence() {
        let dir = TempDir::new().unwrap();
        let storage = StorageManager::with_dir(dir.path().to_path_buf());

        let store = FileSettingsStore::open(storage.clone(), "pg").unwrap();
        assert_eq!(store.default_rating(), "pg");

        storage
            .save_options(&PersistedOptions {
                salt: None,
                default_rating: Some("R".to_string()),
            })
            .unwrap();
        let store = FileSettingsStore::open(storage, "pg").unwrap();
        assert_eq!(store.default_rating(), "R");
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let store = FileSettingsStore::open(StorageManager::with_dir(blocker.join("sub")), "g")
            .unwrap();

        assert!(matches!(
            store.store_salt("x").await,
            Err(SettingsError::StoreFailed(_))
        ));
        assert_eq!(store.get_salt().await.unwrap(), None);
    }
}
