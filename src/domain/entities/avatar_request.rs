//! Avatar resolution request types.

use std::path::PathBuf;

use super::{IdentityHash, IdentityKind, ImageFormat, Rating};

/// Largest edge length, in pixels, any artifact is produced at.
pub const MAX_AVATAR_SIZE: u32 = 2048;

/// A request to resolve an avatar to a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRequest {
    /// Avatar type key (icon provider name, handler key or legacy URL).
    pub avatar_type: String,
    /// Local identity hash.
    pub hash: IdentityHash,
    /// Edge length in pixels.
    pub size: u32,
    /// Audience rating. `None` defers to the configured default.
    pub rating: Option<Rating>,
    /// Mimetype hint for the cached artifact.
    pub mimetype: Option<String>,
    /// Regenerate even when a cached artifact exists.
    pub force: bool,
}

impl AvatarRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(avatar_type: impl Into<String>, hash: IdentityHash, size: u32) -> Self {
        Self {
            avatar_type: avatar_type.into(),
            hash,
            size,
            rating: None,
            mimetype: None,
            force: false,
        }
    }

    /// Sets the rating from a raw value.
    #[must_use]
    pub fn with_rating(mut self, rating: &str) -> Self {
        self.rating = Some(Rating::normalize(rating));
        self
    }

    /// Sets the mimetype hint.
    #[must_use]
    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    /// Sets the force flag.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Format requested through the mimetype hint, if recognized.
    #[must_use]
    pub fn requested_format(&self) -> Option<ImageFormat> {
        self.mimetype.as_deref().and_then(ImageFormat::from_mimetype)
    }
}

/// Result of the external upload pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Path of the uploaded source file.
    pub file: PathBuf,
    /// Mimetype reported by the upload pipeline.
    pub mimetype: String,
}

impl UploadedImage {
    /// Creates a new upload result.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, mimetype: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            mimetype: mimetype.into(),
        }
    }
}

/// Additional inputs some handlers need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveArgs {
    /// Raw identifier (email address), needed by the remote proxy.
    pub identifier: Option<String>,
    /// Uploaded source image, needed by the user upload handler.
    pub upload: Option<UploadedImage>,
    /// Declared owner kind of the hash.
    pub identity: Option<IdentityKind>,
}

impl ResolveArgs {
    /// Sets the raw identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the uploaded image.
    #[must_use]
    pub fn with_upload(mut self, upload: UploadedImage) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Sets the identity kind.
    #[must_use]
    pub const fn with_identity(mut self, kind: IdentityKind) -> Self {
        self.identity = Some(kind);
        self
    }

    /// Declared identity kind, anonymous when unknown.
    #[must_use]
    pub fn identity_kind(&self) -> IdentityKind {
        self.identity.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let hash = IdentityHash::compute("salt", "a@b.c");
        let request = AvatarRequest::new("identicon", hash.clone(), 64)
            .with_rating("bogus")
            .with_mimetype("image/png")
            .with_force(true);

        assert_eq!(request.hash, hash);
        assert_eq!(request.rating, Some(Rating::G));
        assert_eq!(request.requested_format(), Some(ImageFormat::Png));
        assert!(request.force);
    }

    #[test]
    fn test_unknown_mimetype_has_no_format() {
        let hash = IdentityHash::compute("salt", "a@b.c");
        let request = AvatarRequest::new("identicon", hash, 64).with_mimetype("text/plain");
        assert_eq!(request.requested_format(), None);
    }

    #[test]
    fn test_args_default_to_anonymous() {
        assert_eq!(ResolveArgs::default().identity_kind(), IdentityKind::Anonymous);
        let args = ResolveArgs::default().with_identity(IdentityKind::Registered);
        assert_eq!(args.identity_kind(), IdentityKind::Registered);
    }
}
