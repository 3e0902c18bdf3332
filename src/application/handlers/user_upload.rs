use std::sync::Arc;

use super::{USER_AVATAR_NAMESPACE, artifact_path, cached_or_produce, render_blocking};
use crate::domain::entities::{AvatarRequest, ImageFormat, ResolveArgs, ShardPath};
use crate::domain::errors::AvatarError;
use crate::infrastructure::cache::FileCache;
use crate::infrastructure::imaging;

/// Resizes uploaded images into the cache. Never touches the network.
#[derive(Debug)]
pub struct UserUploadHandler {
    cache: Arc<FileCache>,
}

impl UserUploadHandler {
    /// Creates a handler storing uploads in `cache`.
    #[must_use]
    pub const fn new(cache: Arc<FileCache>) -> Self {
        Self { cache }
    }

    /// Output format: a raster mimetype hint, else the upload's own format,
    /// else png.
    fn format(request: &AvatarRequest, args: &ResolveArgs) -> ImageFormat {
        request
            .requested_format()
            .filter(|f| f.is_raster())
            .or_else(|| {
                args.upload
                    .as_ref()
                    .and_then(|upload| ImageFormat::from_mimetype(&upload.mimetype))
                    .filter(|f| f.is_raster())
            })
            .unwrap_or(ImageFormat::Png)
    }

    /// Returns the URL of the resized upload, or `default_url` without one.
    pub async fn get_url(
        &self,
        default_url: &str,
        request: &AvatarRequest,
        args: &ResolveArgs,
    ) -> String {
        let format = Self::format(request, args);
        let shard = ShardPath::for_hash(&request.hash, args.identity_kind());
        let path = artifact_path(
            USER_AVATAR_NAMESPACE,
            shard,
            &request.hash,
            request.size,
            format,
        );
        let size = request.size;

        cached_or_produce(&self.cache, &path, request.force, default_url, move || async move {
            let upload = args
                .upload
                .as_ref()
                .ok_or(AvatarError::MissingInput("upload"))?;
            let source = tokio::fs::read(&upload.file)
                .await
                .map_err(|e| AvatarError::io(upload.file.display().to_string(), e))?;

            render_blocking(move || imaging::resize_square(&source, size, format)).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{cache, hash, png};
    use crate::domain::entities::UploadedImage;
    use tempfile::TempDir;

    fn upload(dir: &TempDir) -> UploadedImage {
        let file = dir.path().join("upload.bin");
        std::fs::write(&file, png(120, 60)).unwrap();
        UploadedImage::new(file, "image/png")
    }

    #[tokio::test]
    async fn test_resizes_upload_into_cache() {
        let (dir, cache) = cache();
        let handler = UserUploadHandler::new(cache.clone());
        let h = hash("someone@example.com");
        let request = AvatarRequest::new("user", h.clone(), 32);
        let args = ResolveArgs::default().with_upload(upload(&dir));

        let url = handler.get_url("/d.png", &request, &args).await;

        let shard = ShardPath::for_hash(&h, args.identity_kind());
        let path = format!("user-avatar/{shard}/{h}-32.png");
        assert_eq!(url, format!("/avatars/{path}"));
        let img = image::load_from_memory(&cache.get(&path).await.unwrap()).unwrap();
        assert_eq!((img.width(), img.height()), (32, 32));
    }

    #[tokio::test]
    async fn test_missing_or_unreadable_upload_returns_default() {
        let (dir, cache) = cache();
        let handler = UserUploadHandler::new(cache);
        let request = AvatarRequest::new("user", hash("a@b.c"), 32);

        assert_eq!(
            handler.get_url("/d.png", &request, &ResolveArgs::default()).await,
            "/d.png"
        );

        let missing = UploadedImage::new(dir.path().join("missing.png"), "image/png");
        let args = ResolveArgs::default().with_upload(missing);
        assert_eq!(handler.get_url("/d.png", &request, &args).await, "/d.png");

        let garbage = dir.path().join("garbage.png");
        std::fs::write(&garbage, b"not an image").unwrap();
        let args = ResolveArgs::default().with_upload(UploadedImage::new(garbage, "image/png"));
        assert_eq!(handler.get_url("/d.png", &request, &args).await, "/d.png");
    }

    #[test]
    fn test_format_selection() {
        let h = hash("a@b.c");
        let jpeg_upload =
            ResolveArgs::default().with_upload(UploadedImage::new("/x", "image/jpeg"));

        let plain = AvatarRequest::new("user", h.clone(), 8);
        assert_eq!(UserUploadHandler::format(&plain, &jpeg_upload), ImageFormat::Jpeg);

        let webp = plain.clone().with_mimetype("image/webp");
        assert_eq!(UserUploadHandler::format(&webp, &jpeg_upload), ImageFormat::Webp);

        let svg = plain.with_mimetype("image/svg+xml");
        let svg_upload =
            ResolveArgs::default().with_upload(UploadedImage::new("/x", "image/svg+xml"));
        assert_eq!(UserUploadHandler::format(&svg, &svg_upload), ImageFormat::Png);
    }
}
