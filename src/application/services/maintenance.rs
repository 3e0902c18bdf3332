//! Cache invalidation and periodic sweeps.

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tracing::{info, warn};

use super::AvatarResolver;
use crate::application::handlers::{CUSTOM_NAMESPACE, GRAVATAR_NAMESPACE, USER_AVATAR_NAMESPACE};
use crate::domain::entities::{AvatarRequest, IdentityHash, ImageFormat, ResolveArgs};
use crate::infrastructure::cache::FileCache;
use crate::infrastructure::icons::IconProviderRegistry;

/// Any cached artifact file name.
const ARTIFACT_PATTERN: &str = r"-\d+\.(?:png|jpg|gif|webp|svg)$";

/// Removes stale or superseded cache entries.
#[derive(Debug)]
pub struct CacheMaintenance {
    cache: Arc<FileCache>,
    registry: Arc<IconProviderRegistry>,
}

impl CacheMaintenance {
    /// Creates a maintenance service over `cache`.
    #[must_use]
    pub const fn new(cache: Arc<FileCache>, registry: Arc<IconProviderRegistry>) -> Self {
        Self { cache, registry }
    }

    /// Purges every cached size of the uploaded avatar of `hash`.
    pub async fn invalidate_user_avatar(&self, hash: &IdentityHash) -> usize {
        let exts = ImageFormat::ALL.map(ImageFormat::extension).join("|");
        let pattern = format!(r"(?:^|[/\\]){}-\d+\.(?:{exts})$", regex::escape(hash.as_str()));
        let Ok(pattern) = Regex::new(&pattern) else {
            warn!(hash = %hash, "Failed to build invalidation pattern");
            return 0;
        };

        let removed = self.cache.invalidate(USER_AVATAR_NAMESPACE, &pattern).await;
        info!(hash = %hash, removed, "Invalidated uploaded avatar");
        removed
    }

    /// Removes fetched remote and legacy artifacts older than `max_age`.
    pub async fn sweep_stale(&self, max_age: Duration) -> usize {
        self.sweep(&[GRAVATAR_NAMESPACE, CUSTOM_NAMESPACE], max_age)
            .await
    }

    /// Removes generated icons older than `max_age`.
    pub async fn sweep_generated(&self, max_age: Duration) -> usize {
        let namespaces = self.registry.names();
        self.sweep(&namespaces, max_age).await
    }

    /// Pre-populates the cache. Returns how many requests produced an artifact.
    pub async fn warm<I>(&self, resolver: &AvatarResolver, requests: I) -> usize
    where
        I: IntoIterator<Item = (AvatarRequest, ResolveArgs)>,
    {
        let mut cached = 0;
        for (request, args) in requests {
            if resolver.cache_image(&request, args).await {
                cached += 1;
            }
        }
        info!(cached, "Cache warmed");
        cached
    }

    async fn sweep(&self, namespaces: &[&str], max_age: Duration) -> usize {
        let Ok(pattern) = Regex::new(ARTIFACT_PATTERN) else {
            return 0;
        };

        let mut removed = 0;
        for namespace in namespaces {
            removed += self
                .cache
                .invalidate_older_than(max_age, namespace, &pattern)
                .await;
        }
        info!(?namespaces, max_age_secs = max_age.as_secs(), removed, "Swept cache");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::context::AvatarContext;
    use crate::application::handlers::test_support::{cache, hash};
    use crate::application::services::Hasher;
    use crate::domain::ports::SettingsPort;
    use crate::domain::ports::mocks::{MockRemoteFetchPort, MockSettings};
    use std::time::SystemTime;

    fn maintenance(cache: Arc<FileCache>) -> CacheMaintenance {
        CacheMaintenance::new(cache, Arc::new(IconProviderRegistry::new()))
    }

    fn age(cache_root: &std::path::Path, relative: &str, by: Duration) {
        let file = std::fs::File::options()
            .write(true)
            .open(cache_root.join(relative))
            .unwrap();
        file.set_modified(SystemTime::now() - by).unwrap();
    }

    #[tokio::test]
    async fn test_invalidate_user_avatar_only_hits_owner() {
        let (_dir, cache) = cache();
        let owner = hash("owner@example.com");
        let other = hash("other@example.com");
        for path in [
            format!("user-avatar/1/a/{owner}-16.png"),
            format!("user-avatar/1/a/{owner}-32.jpg"),
            format!("user-avatar/1/a/{other}-16.png"),
            format!("identicon/1/a/{owner}-16.svg"),
        ] {
            assert!(cache.set(&path, b"x", false).await);
        }

        let removed = maintenance(cache.clone()).invalidate_user_avatar(&owner).await;

        assert_eq!(removed, 2);
        assert!(!cache.contains(&format!("user-avatar/1/a/{owner}-16.png")).await);
        assert!(cache.contains(&format!("user-avatar/1/a/{other}-16.png")).await);
        assert!(cache.contains(&format!("identicon/1/a/{owner}-16.svg")).await);
    }

    #[tokio::test]
    async fn test_sweeps_respect_age_and_namespace() {
        let (_dir, cache) = cache();
        let root = cache.get_base_dir().await.unwrap().to_path_buf();
        let day = Duration::from_secs(86_400);
        for path in [
            "gravatar/1/a/x-16.png",
            "custom/1/a/y-16.png",
            "gravatar/1/a/fresh-16.png",
            "rings/1/a/z-16.svg",
            "user-avatar/1/a/u-16.png",
        ] {
            assert!(cache.set(path, b"x", false).await);
        }
        for path in [
            "gravatar/1/a/x-16.png",
            "custom/1/a/y-16.png",
            "rings/1/a/z-16.svg",
            "user-avatar/1/a/u-16.png",
        ] {
            age(&root, path, 2 * day);
        }

        let maintenance = maintenance(cache.clone());
        assert_eq!(maintenance.sweep_stale(day).await, 2);
        assert!(cache.contains("gravatar/1/a/fresh-16.png").await);
        assert!(cache.contains("rings/1/a/z-16.svg").await);

        assert_eq!(maintenance.sweep_generated(day).await, 1);
        assert!(cache.contains("user-avatar/1/a/u-16.png").await);
    }

    #[tokio::test]
    async fn test_warm_counts_successes() {
        let (_dir, cache) = cache();
        let settings: Arc<dyn SettingsPort> = Arc::new(MockSettings::new());
        let context = AvatarContext::new(
            cache.clone(),
            Arc::new(Hasher::with_salt(settings.clone(), "salt")),
            Arc::new(IconProviderRegistry::new()),
            Arc::new(MockRemoteFetchPort::new()),
            settings,
        );
        let resolver = AvatarResolver::new(&context);

        let requests = vec![
            (AvatarRequest::new("identicon", hash("a"), 32), ResolveArgs::default()),
            (AvatarRequest::new("retro", hash("b"), 32), ResolveArgs::default()),
            (AvatarRequest::new("mystery", hash("c"), 32), ResolveArgs::default()),
        ];

        let cached = maintenance(cache).warm(&resolver, requests).await;
        assert_eq!(cached, 2);
    }
}
