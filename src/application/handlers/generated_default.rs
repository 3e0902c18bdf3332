use std::sync::Arc;

use tracing::debug;

use super::{artifact_path, cached_or_produce, render_blocking};
use crate::domain::entities::{AvatarRequest, ImageFormat, ResolveArgs, ShardPath};
use crate::infrastructure::cache::FileCache;
use crate::infrastructure::icons::IconProviderRegistry;

/// Serves procedurally generated icons, one namespace per provider.
#[derive(Debug)]
pub struct GeneratedDefaultHandler {
    cache: Arc<FileCache>,
    registry: Arc<IconProviderRegistry>,
}

impl GeneratedDefaultHandler {
    /// Creates a handler drawing from `registry`.
    #[must_use]
    pub const fn new(cache: Arc<FileCache>, registry: Arc<IconProviderRegistry>) -> Self {
        Self { cache, registry }
    }

    /// Renders the icon named by the request type. SVG unless another format
    /// is requested.
    pub async fn get_url(
        &self,
        default_url: &str,
        request: &AvatarRequest,
        args: &ResolveArgs,
    ) -> String {
        let Some(provider) = self.registry.get(&request.avatar_type) else {
            debug!(avatar_type = %request.avatar_type, "Unknown icon provider");
            return default_url.to_string();
        };

        let format = request.requested_format().unwrap_or(ImageFormat::Svg);
        let shard = ShardPath::for_hash(&request.hash, args.identity_kind());
        let path = artifact_path(provider.name, shard, &request.hash, request.size, format);

        let generator = provider.generator.clone();
        let hash = request.hash.clone();
        let size = request.size;
        cached_or_produce(&self.cache, &path, request.force, default_url, || {
            render_blocking(move || generator.render(&hash, size, format))
        })
        .await
    }
}
