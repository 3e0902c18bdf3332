//! reqwest backed implementation of [`RemoteFetchPort`].

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::Client;
use tracing::{debug, trace};

use crate::domain::errors::FetchError;
use crate::domain::ports::{FetchedImage, RemoteFetchPort};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Largest response body accepted by default.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Single-attempt HTTP GET client with a bounded timeout and body size.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            max_body_bytes: MAX_BODY_BYTES,
        })
    }

    /// Overrides the response body limit.
    #[must_use]
    pub const fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

#[async_trait]
impl RemoteFetchPort for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        trace!(url = %url, "Fetching remote image");
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "Remote image request rejected");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        check_content_type(content_type.as_deref())?;

        let limit = self.max_body_bytes;
        check_content_length(response.content_length(), limit)?;

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::request(format!("failed to read body: {e}")))?
        {
            if body.len() + chunk.len() > limit {
                debug!(url = %url, limit, "Remote image body too large");
                return Err(FetchError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        let bytes = body.freeze();
        if bytes.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}

/// Rejects responses that announce a body above `limit`.
fn check_content_length(length: Option<u64>, limit: usize) -> Result<(), FetchError> {
    match length {
        Some(length) if usize::try_from(length).map_or(true, |length| length > limit) => {
            Err(FetchError::TooLarge { limit })
        }
        _ => Ok(()),
    }
}

/// Rejects responses that announce a non-image body. A missing header is allowed.
fn check_content_type(content_type: Option<&str>) -> Result<(), FetchError> {
    match content_type {
        Some(value) if !value.trim().to_ascii_lowercase().starts_with("image/") => {
            Err(FetchError::NotAnImage {
                content_type: value.to_string(),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one HTTP response with `body` and returns its URL.
    async fn serve_once(body: Vec<u8>, content_length: bool) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let head = if content_length {
                format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: image/png\r\ncontent-length: {}\r\n\r\n",
                    body.len()
                )
            } else {
                "HTTP/1.1 200 OK\r\ncontent-type: image/png\r\nconnection: close\r\n\r\n"
                    .to_string()
            };
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&body).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/avatar.png")
    }

    #[test_case(None, true ; "unknown length")]
    #[test_case(Some(16), true ; "at limit")]
    #[test_case(Some(17), false ; "above limit")]
    #[test_case(Some(u64::MAX), false ; "huge")]
    fn test_check_content_length(length: Option<u64>, ok: bool) {
        assert_eq!(check_content_length(length, 16).is_ok(), ok);
    }

    #[tokio::test]
    async fn test_body_within_limit() {
        let url = serve_once(vec![7u8; 64], true).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5))
            .unwrap()
            .with_max_body_bytes(64);

        let fetched = fetcher.fetch(&url).await.unwrap();
        assert_eq!(fetched.bytes.len(), 64);
        assert_eq!(fetched.content_type.as_deref(), Some("image/png"));
    }

    #[test_case(true ; "declared length")]
    #[test_case(false ; "streamed body")]
    #[tokio::test]
    async fn test_oversize_body_rejected(content_length: bool) {
        let url = serve_once(vec![7u8; 4096], content_length).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5))
            .unwrap()
            .with_max_body_bytes(1024);

        assert_eq!(
            fetcher.fetch(&url).await,
            Err(FetchError::TooLarge { limit: 1024 })
        );
    }

    #[test_case(Some("image/png"), true ; "png")]
    #[test_case(Some("Image/JPEG; charset=binary"), true ; "mixed case with params")]
    #[test_case(None, true ; "missing header")]
    #[test_case(Some("text/html"), false ; "html error page")]
    fn test_check_content_type(content_type: Option<&str>, ok: bool) {
        assert_eq!(check_content_type(content_type).is_ok(), ok);
    }

    #[test]
    fn test_builds_client() {
        assert!(HttpFetcher::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let fetcher = HttpFetcher::new(Duration::from_millis(500)).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:9/avatar.png").await;
        assert!(matches!(result, Err(FetchError::Request { .. })));
    }
}
