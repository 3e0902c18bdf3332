//! Outbound HTTP adapters.

mod http_fetcher;
mod urls;

pub use http_fetcher::HttpFetcher;
pub use urls::{gravatar_url, parse_image_url};
