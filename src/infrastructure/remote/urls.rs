//! Outbound URL construction and validation.

use url::Url;

use crate::domain::entities::{ImageFormat, Rating, RemoteHash};
use crate::domain::errors::FetchError;

/// Builds the remote avatar URL.
///
/// `d=404` makes the service answer "not found" instead of serving its own
/// placeholder, so a miss falls back to the caller's default.
///
/// # Errors
/// Returns error if `base` is not an absolute http(s) URL.
pub fn gravatar_url(
    base: &str,
    hash: &RemoteHash,
    size: u32,
    rating: Rating,
    format: ImageFormat,
) -> Result<Url, FetchError> {
    let mut url = Url::parse(base).map_err(|e| FetchError::invalid_url(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::invalid_url(format!(
            "unsupported scheme: {}",
            url.scheme()
        )));
    }

    let path = format!(
        "{}/{}.{}",
        url.path().trim_end_matches('/'),
        hash.as_str(),
        format.extension()
    );
    url.set_path(&path);
    url.query_pairs_mut()
        .clear()
        .append_pair("s", &size.to_string())
        .append_pair("r", rating.as_str())
        .append_pair("d", "404");

    Ok(url)
}

/// Parses `value` as a directly linkable image URL.
///
/// Only http(s) URLs with a host and a path ending in a known image extension
/// are accepted. Returns the URL and the format implied by its extension.
#[must_use]
pub fn parse_image_url(value: &str) -> Option<(Url, ImageFormat)> {
    let url = Url::parse(value.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return None;
    }

    let extension = url.path().rsplit_once('.')?.1;
    if extension.contains('/') {
        return None;
    }
    let format = ImageFormat::from_extension(extension)?;
    Some((url, format))
}
