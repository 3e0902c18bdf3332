//! Settings provider port definition.

use async_trait::async_trait;

use crate::domain::errors::SettingsError;

/// Port for installation-wide options.
#[async_trait]
pub trait SettingsPort: Send + Sync {
    /// Retrieves the persisted hashing salt.
    async fn get_salt(&self) -> Result<Option<String>, SettingsError>;

    /// Persists the hashing salt.
    async fn store_salt(&self, salt: &str) -> Result<(), SettingsError>;

    /// Returns the stored default rating exactly as persisted.
    fn default_rating(&self) -> String;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    /// In-memory settings for testing.
    pub struct MockSettings {
        salt: Arc<RwLock<Option<String>>>,
        rating: String,
        stores: AtomicUsize,
        fail_store: bool,
    }

    impl MockSettings {
        /// Creates empty settings.
        pub fn new() -> Self {
            Self {
                salt: Arc::new(RwLock::new(None)),
                rating: "g".to_string(),
                stores: AtomicUsize::new(0),
                fail_store: false,
            }
        }

        /// Creates settings with a persisted salt.
        pub fn with_salt(salt: &str) -> Self {
            Self {
                salt: Arc::new(RwLock::new(Some(salt.to_string()))),
                ..Self::new()
            }
        }

        /// Sets the raw default rating.
        pub fn with_rating(mut self, rating: &str) -> Self {
            self.rating = rating.to_string();
            self
        }

        /// Makes every store call fail.
        pub fn failing_store(mut self) -> Self {
            self.fail_store = true;
            self
        }

        /// Number of successful store calls.
        pub fn store_count(&self) -> usize {
            self.stores.load(Ordering::SeqCst)
        }

        /// Currently persisted salt.
        pub async fn persisted_salt(&self) -> Option<String> {
            self.salt.read().await.clone()
        }
    }

    impl Default for MockSettings {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl SettingsPort for MockSettings {
        async fn get_salt(&self) -> Result<Option<String>, SettingsError> {
            Ok(self.salt.read().await.clone())
        }

        async fn store_salt(&self, salt: &str) -> Result<(), SettingsError> {
            if self.fail_store {
                return Err(SettingsError::StoreFailed("read-only".to_string()));
            }
            *self.salt.write().await = Some(salt.to_string());
            self.stores.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn default_rating(&self) -> String {
            self.rating.clone()
        }
    }
}
