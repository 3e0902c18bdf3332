use std::sync::Arc;

use tracing::{debug, trace};

use super::{GRAVATAR_NAMESPACE, artifact_path, cached_or_produce, fetch_failed};
use crate::application::services::Hasher;
use crate::domain::entities::{AvatarRequest, ImageFormat, Rating, ResolveArgs, ShardPath};
use crate::domain::errors::AvatarError;
use crate::domain::ports::{RemoteFetchPort, SettingsPort};
use crate::infrastructure::cache::FileCache;
use crate::infrastructure::remote::gravatar_url;

/// Proxies the remote avatar service through the local cache.
///
/// The remote service only ever sees the unsalted remote hash; cache entries
/// are keyed by the salted local hash.
pub struct RemoteProxyHandler {
    cache: Arc<FileCache>,
    hasher: Arc<Hasher>,
    fetcher: Arc<dyn RemoteFetchPort>,
    settings: Arc<dyn SettingsPort>,
    base_url: String,
}

impl std::fmt::Debug for RemoteProxyHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteProxyHandler")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RemoteProxyHandler {
    /// Creates a proxy for the service at `base_url`.
    #[must_use]
    pub fn new(
        cache: Arc<FileCache>,
        hasher: Arc<Hasher>,
        fetcher: Arc<dyn RemoteFetchPort>,
        settings: Arc<dyn SettingsPort>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            hasher,
            fetcher,
            settings,
            base_url: base_url.into(),
        }
    }

    /// Rating sent to the remote service.
    fn rating(&self, request: &AvatarRequest) -> Rating {
        request
            .rating
            .unwrap_or_else(|| Rating::normalize(&self.settings.default_rating()))
    }

    /// Returns the URL of the cached remote avatar, fetching it on a miss.
    pub async fn get_url(
        &self,
        default_url: &str,
        request: &AvatarRequest,
        args: &ResolveArgs,
    ) -> String {
        let format = match request.requested_format() {
            Some(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => format,
            _ => ImageFormat::Png,
        };
        let shard = ShardPath::for_hash(&request.hash, args.identity_kind());
        let path = artifact_path(
            GRAVATAR_NAMESPACE,
            shard,
            &request.hash,
            request.size,
            format,
        );

        cached_or_produce(&self.cache, &path, request.force, default_url, move || async move {
            let identifier = args
                .identifier
                .as_deref()
                .ok_or(AvatarError::MissingInput("identifier"))?;
            let remote_hash = self.hasher.get_remote_hash(identifier);
            let url = gravatar_url(
                &self.base_url,
                &remote_hash,
                request.size,
                self.rating(request),
                format,
            )?;

            trace!(url = %url, "Requesting remote avatar");
            let fetched = self
                .fetcher
                .fetch(url.as_str())
                .await
                .map_err(|e| fetch_failed(url.as_str(), e))?;
            debug!(bytes = fetched.bytes.len(), "Fetched remote avatar");

            Ok(fetched.bytes.to_vec())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{cache, hash};
    use crate::domain::entities::RemoteHash;
    use crate::domain::errors::FetchError;
    use crate::domain::ports::FetchedImage;
    use crate::domain::ports::mocks::{MockRemoteFetchPort, MockSettings};
    use bytes::Bytes;
    use mockall::predicate::eq;

    const BASE: &str = "https://avatars.example.com/avatar";

    fn handler(
        cache: Arc<FileCache>,
        fetcher: MockRemoteFetchPort,
        settings: MockSettings,
    ) -> RemoteProxyHandler {
        let settings: Arc<dyn SettingsPort> = Arc::new(settings);
        RemoteProxyHandler::new(
            cache,
            Arc::new(Hasher::with_salt(settings.clone(), "salt")),
            Arc::new(fetcher),
            settings,
            BASE,
        )
    }

    fn expected_url(identifier: &str, size: u32, rating: &str) -> String {
        format!(
            "{BASE}/{}.png?s={size}&r={rating}&d=404",
            RemoteHash::compute(identifier).as_str()
        )
    }

    #[tokio::test]
    async fn test_fetches_and_caches() {
        let (_dir, cache) = cache();
        let mut fetcher = MockRemoteFetchPort::new();
        fetcher
            .expect_fetch()
            .with(eq(expected_url("someone@example.com", 80, "pg")))
            .times(1)
            .returning(|_| {
                Ok(FetchedImage {
                    bytes: Bytes::from_static(b"remote-bytes"),
                    content_type: Some("image/png".to_string()),
                })
            });
        let handler = handler(cache.clone(), fetcher, MockSettings::new().with_rating("PG"));

        let h = hash("someone@example.com");
        let request = AvatarRequest::new("gravatar", h.clone(), 80);
        let args = ResolveArgs::default().with_identifier("Someone@Example.com");

        let url = handler.get_url("/default.png", &request, &args).await;
        let shard = ShardPath::for_hash(&h, args.identity_kind());
        let path = format!("gravatar/{shard}/{h}-80.png");
        assert_eq!(url, format!("/avatars/{path}"));
        assert_eq!(cache.get(&path).await.unwrap(), b"remote-bytes");

        // second call is served from the cache; the mock allows one fetch only
        assert_eq!(handler.get_url("/default.png", &request, &args).await, url);
    }

    #[tokio::test]
    async fn test_request_rating_wins_and_unknown_is_g() {
        let (_dir, cache) = cache();
        let mut fetcher = MockRemoteFetchPort::new();
        fetcher
            .expect_fetch()
            .with(eq(expected_url("a@b.c", 40, "g")))
            .times(1)
            .returning(|_| {
                Ok(FetchedImage {
                    bytes: Bytes::from_static(b"x"),
                    content_type: None,
                })
            });
        let handler = handler(cache, fetcher, MockSettings::new().with_rating("x"));

        let request = AvatarRequest::new("gravatar", hash("a@b.c"), 40).with_rating("nonsense");
        let args = ResolveArgs::default().with_identifier("a@b.c");
        assert!(handler.get_url("", &request, &args).await.ends_with("-40.png"));
    }

    #[tokio::test]
    async fn test_not_found_returns_default() {
        let (_dir, cache) = cache();
        let mut fetcher = MockRemoteFetchPort::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(FetchError::Status { status: 404 }));
        let handler = handler(cache.clone(), fetcher, MockSettings::new());

        let request = AvatarRequest::new("gravatar", hash("a@b.c"), 40);
        let args = ResolveArgs::default().with_identifier("a@b.c");
        assert_eq!(handler.get_url("/d.png", &request, &args).await, "/d.png");
    }

    #[tokio::test]
    async fn test_missing_identifier_skips_network() {
        let (_dir, cache) = cache();
        let mut fetcher = MockRemoteFetchPort::new();
        fetcher.expect_fetch().never();
        let handler = handler(cache, fetcher, MockSettings::new());

        let request = AvatarRequest::new("gravatar", hash("a@b.c"), 40);
        assert_eq!(
            handler.get_url("/d.png", &request, &ResolveArgs::default()).await,
            "/d.png"
        );
    }

    #[tokio::test]
    async fn test_jpeg_hint_is_honoured_svg_is_not() {
        let (_dir, cache) = cache();
        let mut fetcher = MockRemoteFetchPort::new();
        fetcher.expect_fetch().times(2).returning(|_| {
            Ok(FetchedImage {
                bytes: Bytes::from_static(b"x"),
                content_type: None,
            })
        });
        let handler = handler(cache, fetcher, MockSettings::new());
        let args = ResolveArgs::default().with_identifier("a@b.c");

        let jpeg = AvatarRequest::new("gravatar", hash("a@b.c"), 40).with_mimetype("image/jpeg");
        assert!(handler.get_url("", &jpeg, &args).await.ends_with("-40.jpg"));

        let svg = AvatarRequest::new("gravatar", hash("a@b.c"), 40).with_mimetype("image/svg+xml");
        assert!(handler.get_url("", &svg, &args).await.ends_with("-40.png"));
    }
}
