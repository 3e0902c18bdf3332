//! Shared collaborators of the avatar services.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::application::services::Hasher;
use crate::domain::errors::AvatarError;
use crate::domain::ports::{IdentityLookupPort, RemoteFetchPort, SettingsPort};
use crate::infrastructure::cache::FileCache;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::icons::IconProviderRegistry;
use crate::infrastructure::remote::HttpFetcher;

/// Remote avatar service switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GravatarOptions {
    /// Whether the remote proxy is registered.
    pub enabled: bool,
    /// Avatar endpoint, without the hash.
    pub base_url: String,
}

impl Default for GravatarOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://www.gravatar.com/avatar".to_string(),
        }
    }
}

/// Everything the resolver and maintenance services share.
#[derive(Clone)]
pub struct AvatarContext {
    /// Artifact store.
    pub cache: Arc<FileCache>,
    /// Salted identity hasher.
    pub hasher: Arc<Hasher>,
    /// Icon providers.
    pub registry: Arc<IconProviderRegistry>,
    /// Outbound HTTP client.
    pub fetcher: Arc<dyn RemoteFetchPort>,
    /// Installation options.
    pub settings: Arc<dyn SettingsPort>,
    /// Optional hash to owner lookup.
    pub identity_lookup: Option<Arc<dyn IdentityLookupPort>>,
    /// Remote avatar service switches.
    pub gravatar: GravatarOptions,
}

impl std::fmt::Debug for AvatarContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarContext")
            .field("cache", &self.cache)
            .field("gravatar", &self.gravatar)
            .finish_non_exhaustive()
    }
}

impl AvatarContext {
    /// Wires the collaborators. Remote proxying uses the default options.
    #[must_use]
    pub fn new(
        cache: Arc<FileCache>,
        hasher: Arc<Hasher>,
        registry: Arc<IconProviderRegistry>,
        fetcher: Arc<dyn RemoteFetchPort>,
        settings: Arc<dyn SettingsPort>,
    ) -> Self {
        Self {
            cache,
            hasher,
            registry,
            fetcher,
            settings,
            identity_lookup: None,
            gravatar: GravatarOptions::default(),
        }
    }

    /// Sets the identity lookup.
    #[must_use]
    pub fn with_identity_lookup(mut self, lookup: Arc<dyn IdentityLookupPort>) -> Self {
        self.identity_lookup = Some(lookup);
        self
    }

    /// Sets the remote proxy options.
    #[must_use]
    pub fn with_gravatar(mut self, gravatar: GravatarOptions) -> Self {
        self.gravatar = gravatar;
        self
    }

    /// Builds the production context from configuration.
    ///
    /// The cache root is created eagerly, so an unusable root fails here
    /// rather than on the first request.
    ///
    /// # Errors
    /// Returns error if the cache root cannot be determined or created, or
    /// the HTTP client cannot be built.
    pub async fn from_config(
        config: &AppConfig,
        settings: Arc<dyn SettingsPort>,
    ) -> Result<Self, AvatarError> {
        let root = config
            .effective_cache_root()
            .ok_or(AvatarError::MissingInput("cache root"))?;
        let cache = Arc::new(FileCache::new(root, &config.cache.base_url));
        let base_dir = cache.get_base_dir().await?;
        info!(root = %base_dir.display(), base_url = cache.get_base_url(), "Avatar cache ready");

        let fetcher = HttpFetcher::new(Duration::from_secs(config.gravatar.timeout_secs))?;
        let hasher = Hasher::new(settings.clone(), config.salt.clone());

        Ok(Self::new(
            cache,
            Arc::new(hasher),
            Arc::new(IconProviderRegistry::new()),
            Arc::new(fetcher),
            settings,
        )
        .with_gravatar(GravatarOptions {
            enabled: config.gravatar.enabled,
            base_url: config.gravatar.base_url.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockSettings;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_from_config_creates_root() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.cache.root = Some(dir.path().join("a").join("b"));
        config.gravatar.enabled = false;

        let context = AvatarContext::from_config(&config, Arc::new(MockSettings::new()))
            .await
            .unwrap();

        assert!(dir.path().join("a").join("b").is_dir());
        assert_eq!(context.cache.get_base_url(), "/avatars/");
        assert!(!context.gravatar.enabled);
    }

    #[tokio::test]
    async fn test_from_config_unusable_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        let mut config = AppConfig::default();
        config.cache.root = Some(file);

        let result = AvatarContext::from_config(&config, Arc::new(MockSettings::new())).await;
        assert!(matches!(result, Err(AvatarError::Filesystem(_))));
    }
}
