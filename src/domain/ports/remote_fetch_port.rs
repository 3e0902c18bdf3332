//! Port definition for outbound image requests.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FetchError;

/// Body and content type of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    /// Response body, never empty.
    pub bytes: Bytes,
    /// `Content-Type` header, if present.
    pub content_type: Option<String>,
}

/// Port for bounded-time HTTP GET requests.
/// Implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteFetchPort: Send + Sync {
    /// Fetches `url`, failing on non-2xx status or an empty body.
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError>;
}
