use std::sync::Arc;

use tracing::debug;

use super::{CUSTOM_NAMESPACE, artifact_path, cached_or_produce, fetch_failed, render_blocking};
use crate::application::services::Hasher;
use crate::domain::entities::{AvatarRequest, ImageFormat, ResolveArgs, ShardPath};
use crate::domain::errors::{AvatarError, RenderError};
use crate::domain::ports::RemoteFetchPort;
use crate::infrastructure::cache::FileCache;
use crate::infrastructure::imaging;
use crate::infrastructure::remote::parse_image_url;

/// Caches avatars whose type is a direct image URL.
pub struct LegacyFallbackHandler {
    cache: Arc<FileCache>,
    hasher: Arc<Hasher>,
    fetcher: Arc<dyn RemoteFetchPort>,
}

impl std::fmt::Debug for LegacyFallbackHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyFallbackHandler")
            .finish_non_exhaustive()
    }
}

impl LegacyFallbackHandler {
    /// Creates a handler keyed by `hasher`.
    #[must_use]
    pub fn new(
        cache: Arc<FileCache>,
        hasher: Arc<Hasher>,
        fetcher: Arc<dyn RemoteFetchPort>,
    ) -> Self {
        Self {
            cache,
            hasher,
            fetcher,
        }
    }

    /// Whether `avatar_type` is a URL this handler can serve.
    #[must_use]
    pub fn accepts(avatar_type: &str) -> bool {
        parse_image_url(avatar_type).is_some()
    }

    /// Returns the URL of the cached copy of the image at the request's type.
    pub async fn get_url(
        &self,
        default_url: &str,
        request: &AvatarRequest,
        args: &ResolveArgs,
    ) -> String {
        let Some((url, format)) = parse_image_url(&request.avatar_type) else {
            debug!(avatar_type = %request.avatar_type, "Not an image URL");
            return default_url.to_string();
        };

        let hash = match self.hasher.get_hash(url.as_str()).await {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot hash legacy avatar URL");
                return default_url.to_string();
            }
        };
        let shard = ShardPath::for_hash(&hash, args.identity_kind());
        let path = artifact_path(CUSTOM_NAMESPACE, shard, &hash, request.size, format);
        let size = request.size;

        cached_or_produce(&self.cache, &path, request.force, default_url, move || async move {
            let fetched = self
                .fetcher
                .fetch(url.as_str())
                .await
                .map_err(|e| fetch_failed(url.as_str(), e))?;

            if format == ImageFormat::Svg {
                if !looks_like_svg(&fetched.bytes) {
                    return Err(AvatarError::from(RenderError::decode("not an svg document")));
                }
                return Ok(fetched.bytes.to_vec());
            }

            render_blocking(move || imaging::resize_square(&fetched.bytes, size, format)).await
        })
        .await
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    String::from_utf8_lossy(head).contains("<svg")
}
