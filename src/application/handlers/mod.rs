//! Avatar source handlers.
//!
//! Every handler maps a request to a cached artifact under its own namespace,
//! producing the artifact on a miss. Expected failures never escape: they are
//! logged and the caller's default URL is returned instead.

mod generated_default;
mod legacy_fallback;
mod remote_proxy;
mod user_upload;

pub use generated_default::GeneratedDefaultHandler;
pub use legacy_fallback::LegacyFallbackHandler;
pub use remote_proxy::RemoteProxyHandler;
pub use user_upload::UserUploadHandler;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{
    AvatarRequest, IdentityHash, IdentityKind, ImageFormat, ResolveArgs, ShardPath,
};
use crate::domain::errors::{AvatarError, FetchError, RenderError};
use crate::infrastructure::cache::FileCache;

/// Namespace of proxied remote avatars.
pub const GRAVATAR_NAMESPACE: &str = "gravatar";
/// Namespace of uploaded avatars.
pub const USER_AVATAR_NAMESPACE: &str = "user-avatar";
/// Namespace of avatars fetched from arbitrary image URLs.
pub const CUSTOM_NAMESPACE: &str = "custom";

/// The fixed set of avatar sources.
#[derive(Debug, Clone)]
pub enum AvatarHandler {
    /// Procedurally generated icon.
    GeneratedDefault(Arc<GeneratedDefaultHandler>),
    /// Remote avatar service proxy.
    RemoteProxy(Arc<RemoteProxyHandler>),
    /// User uploaded image.
    UserUpload(Arc<UserUploadHandler>),
    /// Direct image URL.
    LegacyFallback(Arc<LegacyFallbackHandler>),
}

impl AvatarHandler {
    /// Stable handler identifier.
    #[must_use]
    pub const fn get_type(&self) -> &'static str {
        match self {
            Self::GeneratedDefault(_) => "generated-default",
            Self::RemoteProxy(_) => "remote-proxy",
            Self::UserUpload(_) => "user-upload",
            Self::LegacyFallback(_) => "legacy-fallback",
        }
    }

    /// Shard directories for `hash` declared as `kind`.
    #[must_use]
    pub fn get_sub_dir(&self, hash: &IdentityHash, kind: IdentityKind) -> String {
        ShardPath::for_hash(hash, kind).to_string()
    }

    /// Resolves the request to a cached artifact URL, or `default_url`.
    pub async fn get_url(
        &self,
        default_url: &str,
        request: &AvatarRequest,
        args: &ResolveArgs,
    ) -> String {
        match self {
            Self::GeneratedDefault(handler) => handler.get_url(default_url, request, args).await,
            Self::RemoteProxy(handler) => handler.get_url(default_url, request, args).await,
            Self::UserUpload(handler) => handler.get_url(default_url, request, args).await,
            Self::LegacyFallback(handler) => handler.get_url(default_url, request, args).await,
        }
    }

    /// Pre-populates the cache. Returns whether an artifact is available.
    pub async fn cache_image(
        &self,
        avatar_type: &str,
        hash: &IdentityHash,
        size: u32,
        kind: IdentityKind,
        extension: &str,
    ) -> bool {
        let mut request = AvatarRequest::new(avatar_type, hash.clone(), size);
        if let Some(format) = ImageFormat::from_extension(extension) {
            request = request.with_mimetype(format.mimetype());
        }
        let args = ResolveArgs::default().with_identity(kind);

        !self.get_url("", &request, &args).await.is_empty()
    }
}

/// Relative cache path `{namespace}/{shard}/{hash}-{size}.{ext}`.
#[must_use]
pub fn artifact_path(
    namespace: &str,
    shard: ShardPath,
    hash: &IdentityHash,
    size: u32,
    format: ImageFormat,
) -> String {
    format!(
        "{namespace}/{shard}/{hash}-{size}.{}",
        format.extension()
    )
}

/// Returns the cached artifact at `path`, producing and storing it on a miss.
///
/// Any failure yields `default_url`.
pub(crate) async fn cached_or_produce<F, Fut>(
    cache: &FileCache,
    path: &str,
    force: bool,
    default_url: &str,
    produce: F,
) -> String
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<u8>, AvatarError>>,
{
    if !force && cache.contains(path).await {
        debug!(path, "Avatar cache hit");
        return cache.get_url(path);
    }

    match produce().await {
        Ok(bytes) => {
            if cache.set(path, &bytes, force).await {
                debug!(path, bytes = bytes.len(), "Avatar cached");
                cache.get_url(path)
            } else {
                default_url.to_string()
            }
        }
        Err(e) if is_expected(&e) => {
            debug!(path, reason = %e, "No avatar produced, using default");
            default_url.to_string()
        }
        Err(e) => {
            warn!(path, error = %e, "Failed to produce avatar, using default");
            default_url.to_string()
        }
    }
}

/// Failures that are part of normal operation rather than faults.
fn is_expected(error: &AvatarError) -> bool {
    match error {
        AvatarError::MissingInput(_) => true,
        AvatarError::Fetch(e) => e.is_not_found(),
        _ => false,
    }
}

/// Runs CPU bound image work off the async worker threads.
pub(crate) async fn render_blocking<F>(work: F) -> Result<Vec<u8>, AvatarError>
where
    F: FnOnce() -> Result<Vec<u8>, RenderError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| RenderError::Task {
            message: e.to_string(),
        })?
        .map_err(AvatarError::from)
}

/// Converts a fetch error, keeping the "not found" answer quiet.
pub(crate) fn fetch_failed(url: &str, error: FetchError) -> AvatarError {
    if !error.is_not_found() {
        warn!(url, error = %error, "Remote avatar fetch failed");
    }
    AvatarError::Fetch(error)
}
