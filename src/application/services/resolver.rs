//! Dispatch of avatar requests to their source handler.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::application::context::AvatarContext;
use crate::application::handlers::{
    AvatarHandler, GeneratedDefaultHandler, LegacyFallbackHandler, RemoteProxyHandler,
    UserUploadHandler,
};
use crate::domain::entities::{AvatarRequest, MAX_AVATAR_SIZE, ResolveArgs};
use crate::domain::ports::IdentityLookupPort;

/// Type key served by the remote avatar proxy.
pub const GRAVATAR_TYPE: &str = "gravatar";
/// Type key served by the upload handler.
pub const USER_TYPE: &str = "user";

/// Resolves avatar requests to public URLs.
///
/// The handler table is built once; lookups never allocate handlers.
pub struct AvatarResolver {
    handlers: HashMap<String, AvatarHandler>,
    legacy: AvatarHandler,
    identity_lookup: Option<Arc<dyn IdentityLookupPort>>,
}

impl std::fmt::Debug for AvatarResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.handlers.keys().collect();
        types.sort();
        f.debug_struct("AvatarResolver")
            .field("types", &types)
            .finish_non_exhaustive()
    }
}

impl AvatarResolver {
    /// Builds the handler table from shared collaborators.
    #[must_use]
    pub fn new(context: &AvatarContext) -> Self {
        let mut handlers = HashMap::new();

        let generated = AvatarHandler::GeneratedDefault(Arc::new(GeneratedDefaultHandler::new(
            context.cache.clone(),
            context.registry.clone(),
        )));
        for name in context.registry.names() {
            handlers.insert(name.to_string(), generated.clone());
        }

        if context.gravatar.enabled {
            handlers.insert(
                GRAVATAR_TYPE.to_string(),
                AvatarHandler::RemoteProxy(Arc::new(RemoteProxyHandler::new(
                    context.cache.clone(),
                    context.hasher.clone(),
                    context.fetcher.clone(),
                    context.settings.clone(),
                    context.gravatar.base_url.clone(),
                ))),
            );
        }

        handlers.insert(
            USER_TYPE.to_string(),
            AvatarHandler::UserUpload(Arc::new(UserUploadHandler::new(context.cache.clone()))),
        );

        let legacy = AvatarHandler::LegacyFallback(Arc::new(LegacyFallbackHandler::new(
            context.cache.clone(),
            context.hasher.clone(),
            context.fetcher.clone(),
        )));

        debug!(handlers = handlers.len(), "Avatar handlers registered");
        Self {
            handlers,
            legacy,
            identity_lookup: context.identity_lookup.clone(),
        }
    }

    /// Handler serving `avatar_type`, if any.
    #[must_use]
    pub fn handler_for(&self, avatar_type: &str) -> Option<&AvatarHandler> {
        self.handlers.get(avatar_type).or_else(|| {
            LegacyFallbackHandler::accepts(avatar_type).then_some(&self.legacy)
        })
    }

    /// Registered type keys, sorted.
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Resolves `request` to a URL. Always returns something usable:
    /// `default_url` when no artifact can be produced.
    pub async fn resolve(
        &self,
        request: &AvatarRequest,
        args: ResolveArgs,
        default_url: &str,
    ) -> String {
        if request.size == 0 || request.size > MAX_AVATAR_SIZE {
            debug!(
                avatar_type = %request.avatar_type,
                size = request.size,
                "Requested size out of range"
            );
            return default_url.to_string();
        }

        let Some(handler) = self.handler_for(&request.avatar_type) else {
            debug!(avatar_type = %request.avatar_type, "No handler for avatar type");
            return default_url.to_string();
        };

        let args = self.complete_args(request, args).await;
        trace!(
            handler = handler.get_type(),
            hash = %request.hash,
            size = request.size,
            "Resolving avatar"
        );
        handler.get_url(default_url, request, &args).await
    }

    /// Pre-populates the cache for `request`.
    pub async fn cache_image(&self, request: &AvatarRequest, args: ResolveArgs) -> bool {
        !self.resolve(request, args, "").await.is_empty()
    }

    /// Fills identity fields the caller left out from the lookup collaborator.
    async fn complete_args(&self, request: &AvatarRequest, mut args: ResolveArgs) -> ResolveArgs {
        if args.identity.is_some() && args.identifier.is_some() {
            return args;
        }
        let Some(lookup) = &self.identity_lookup else {
            return args;
        };

        if let Some(record) = lookup.lookup(&request.hash).await {
            trace!(hash = %request.hash, kind = ?record.kind, "Identity found");
            args.identity.get_or_insert(record.kind);
            if args.identifier.is_none() {
                args.identifier = record.identifier;
            }
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::context::GravatarOptions;
    use crate::application::handlers::test_support::{cache, hash};
    use crate::application::services::Hasher;
    use crate::domain::entities::{IdentityKind, ShardPath};
    use crate::domain::ports::mocks::{MockIdentityLookup, MockRemoteFetchPort, MockSettings};
    use crate::domain::ports::{FetchedImage, IdentityRecord, SettingsPort};
    use crate::infrastructure::cache::FileCache;
    use crate::infrastructure::icons::IconProviderRegistry;
    use bytes::Bytes;

    fn context(cache: Arc<FileCache>, fetcher: MockRemoteFetchPort) -> AvatarContext {
        let settings: Arc<dyn SettingsPort> = Arc::new(MockSettings::new());
        AvatarContext::new(
            cache,
            Arc::new(Hasher::with_salt(settings.clone(), "salt")),
            Arc::new(IconProviderRegistry::new()),
            Arc::new(fetcher),
            settings,
        )
    }

    #[tokio::test]
    async fn test_dispatch_table() {
        let (_dir, cache) = cache();
        let resolver = AvatarResolver::new(&context(cache, MockRemoteFetchPort::new()));

        assert_eq!(
            resolver.types(),
            vec!["gravatar", "identicon", "retro", "rings", "silhouette", "user"]
        );
        assert_eq!(
            resolver.handler_for("identicon").map(AvatarHandler::get_type),
            Some("generated-default")
        );
        assert_eq!(
            resolver.handler_for("gravatar").map(AvatarHandler::get_type),
            Some("remote-proxy")
        );
        assert_eq!(
            resolver.handler_for("user").map(AvatarHandler::get_type),
            Some("user-upload")
        );
        assert_eq!(
            resolver
                .handler_for("https://example.com/a.png")
                .map(AvatarHandler::get_type),
            Some("legacy-fallback")
        );
        assert!(resolver.handler_for("mystery").is_none());
    }

    #[tokio::test]
    async fn test_unknown_type_returns_default_unchanged() {
        let (_dir, cache) = cache();
        let mut fetcher = MockRemoteFetchPort::new();
        fetcher.expect_fetch().never();
        let resolver = AvatarResolver::new(&context(cache, fetcher));

        let request = AvatarRequest::new("mystery", hash("a@b.c"), 64);
        let url = resolver
            .resolve(&request, ResolveArgs::default(), "/static/default.png?v=1")
            .await;
        assert_eq!(url, "/static/default.png?v=1");
    }

    #[tokio::test]
    async fn test_zero_size_returns_default() {
        let (_dir, cache) = cache();
        let resolver = AvatarResolver::new(&context(cache.clone(), MockRemoteFetchPort::new()));

        let request = AvatarRequest::new("identicon", hash("a@b.c"), 0);
        assert_eq!(
            resolver.resolve(&request, ResolveArgs::default(), "/d.png").await,
            "/d.png"
        );
    }

    #[tokio::test]
    async fn test_oversize_returns_default() {
        let (_dir, cache) = cache();
        let mut fetcher = MockRemoteFetchPort::new();
        fetcher.expect_fetch().never();
        let resolver = AvatarResolver::new(&context(cache, fetcher));
        let h = hash("a@b.c");

        for size in [MAX_AVATAR_SIZE + 1, u32::MAX] {
            let request =
                AvatarRequest::new("identicon", h.clone(), size).with_mimetype("image/png");
            assert_eq!(
                resolver.resolve(&request, ResolveArgs::default(), "/d.png").await,
                "/d.png"
            );
            let request = AvatarRequest::new("gravatar", h.clone(), size);
            assert_eq!(
                resolver
                    .resolve(&request, ResolveArgs::default().with_identifier("a@b.c"), "/d.png")
                    .await,
                "/d.png"
            );
        }
    }

    #[tokio::test]
    async fn test_generated_icon_end_to_end() {
        let (_dir, cache) = cache();
        let resolver = AvatarResolver::new(&context(cache.clone(), MockRemoteFetchPort::new()));
        let h = hash("someone@example.com");

        let request = AvatarRequest::new("identicon", h.clone(), 64);
        let url = resolver.resolve(&request, ResolveArgs::default(), "/d.png").await;

        let shard = ShardPath::for_hash(&h, IdentityKind::Anonymous);
        assert_eq!(url, format!("/avatars/identicon/{shard}/{h}-64.svg"));
        assert!(resolver.cache_image(&request, ResolveArgs::default()).await);
    }

    #[tokio::test]
    async fn test_lookup_fills_identity() {
        let (_dir, cache) = cache();
        let h = hash("member@example.com");
        let mut fetcher = MockRemoteFetchPort::new();
        fetcher.expect_fetch().times(1).returning(|_| {
            Ok(FetchedImage {
                bytes: Bytes::from_static(b"img"),
                content_type: Some("image/png".to_string()),
            })
        });
        let lookup = MockIdentityLookup::default().with_record(
            h.clone(),
            IdentityRecord {
                kind: IdentityKind::Registered,
                identifier: Some("member@example.com".to_string()),
            },
        );
        let context = context(cache, fetcher).with_identity_lookup(Arc::new(lookup));
        let resolver = AvatarResolver::new(&context);

        let request = AvatarRequest::new("gravatar", h.clone(), 40);
        let url = resolver.resolve(&request, ResolveArgs::default(), "/d.png").await;

        let shard = ShardPath::for_hash(&h, IdentityKind::Registered);
        assert_eq!(url, format!("/avatars/gravatar/{shard}/{h}-40.png"));
    }

    #[tokio::test]
    async fn test_disabled_gravatar_is_unregistered() {
        let (_dir, cache) = cache();
        let context = context(cache, MockRemoteFetchPort::new()).with_gravatar(GravatarOptions {
            enabled: false,
            base_url: "https://www.gravatar.com/avatar".to_string(),
        });
        let resolver = AvatarResolver::new(&context);

        assert!(resolver.handler_for("gravatar").is_none());
        let request = AvatarRequest::new("gravatar", hash("a@b.c"), 40);
        assert_eq!(
            resolver
                .resolve(&request, ResolveArgs::default().with_identifier("a@b.c"), "/d.png")
                .await,
            "/d.png"
        );
    }
}
