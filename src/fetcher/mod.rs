pub mod caching;
pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

pub use caching::CachingFetcher;
pub use http_fetcher::HttpFetcher;

/// Retrieves the raw bytes of a document.
#[async_trait]
pub trait Fetcher {
    /// Fetch `url`. Only a 200 response counts as success, and the whole
    /// body is read before returning.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
