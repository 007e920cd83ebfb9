use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::app::{CaptionFeedError, Result};
use crate::atom;
use crate::domain::FeedDocument;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::store::{CacheStore, FEED_CACHE_KEY, FEED_CACHE_TTL};

/// Serves the upstream feed from cache, fetching it when the cached copy
/// is missing or stale.
///
/// Concurrent misses each go upstream unless coalescing is enabled, in which
/// case one caller fetches and the rest read what it stored.
pub struct CachingFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    store: Arc<dyn CacheStore + Send + Sync>,
    normalizer: Normalizer,
    url: String,
    key: String,
    ttl: Duration,
    flight: Option<Mutex<()>>,
}

impl CachingFetcher {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        store: Arc<dyn CacheStore + Send + Sync>,
        normalizer: Normalizer,
        url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            store,
            normalizer,
            url: url.into(),
            key: FEED_CACHE_KEY.to_string(),
            ttl: FEED_CACHE_TTL,
            flight: None,
        }
    }

    /// Let only one caller at a time run the fetch path.
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.flight = enabled.then(|| Mutex::new(()));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Return the current feed, from cache when fresh.
    ///
    /// A cached snapshot that fails to parse is reported as
    /// [`CaptionFeedError::CacheCorruption`]; it is not replaced by a fetch.
    pub async fn get_feed(&self) -> Result<FeedDocument> {
        if let Some(feed) = self.lookup()? {
            tracing::info!("found feed in cache");
            return Ok(feed);
        }

        match &self.flight {
            Some(flight) => {
                let _guard = flight.lock().await;
                if let Some(feed) = self.lookup()? {
                    tracing::debug!("feed was cached by a concurrent request");
                    return Ok(feed);
                }
                self.fetch_and_store().await
            }
            None => self.fetch_and_store().await,
        }
    }

    fn lookup(&self) -> Result<Option<FeedDocument>> {
        let bytes = match self.store.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!("Cache read for {} failed: {}", self.key, e);
                return Ok(None);
            }
        };

        atom::parse(&bytes)
            .map(Some)
            .map_err(|e| CaptionFeedError::CacheCorruption(e.to_string()))
    }

    async fn fetch_and_store(&self) -> Result<FeedDocument> {
        tracing::info!("making request to {}", self.url);

        let body = self.fetcher.fetch(&self.url).await?;
        let feed = self.normalizer.normalize(&body)?;

        match atom::serialize(&feed) {
            Ok(bytes) => {
                if let Err(e) = self.store.set(&self.key, &bytes, self.ttl) {
                    tracing::warn!("Failed to cache feed under {}: {}", self.key, e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize feed for caching: {}", e),
        }

        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use crate::normalizer::LinkRewriter;
    use crate::store::MemoryStore;

    const UPSTREAM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xml:lang="en">
<title>xkcd.com</title><link href="http://xkcd.com/" rel="alternate"></link>
<id>http://xkcd.com/</id><updated>2024-03-01T00:00:00Z</updated>
<entry><title>Comic</title><link href="http://xkcd.com/1/" rel="alternate"></link>
<updated>2024-03-01T00:00:00Z</updated><id>http://xkcd.com/1/</id>
<summary type="html">&lt;img src="http://imgs.xkcd.com/comics/c.png" alt="Caption" /&gt;</summary></entry>
</feed>"#;

    struct StubFetcher {
        calls: AtomicUsize,
        response: std::result::Result<Vec<u8>, StatusCode>,
        delay: Duration,
    }

    impl StubFetcher {
        fn ok(body: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Ok(body.as_bytes().to_vec()),
                delay: Duration::ZERO,
            }
        }

        fn status(status: StatusCode) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Err(status),
                delay: Duration::ZERO,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.response
                .clone()
                .map_err(CaptionFeedError::UpstreamStatus)
        }
    }

    /// A store whose writes always fail.
    struct ReadOnlyStore;

    impl CacheStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<()> {
            Err(CaptionFeedError::Cache("read-only".into()))
        }
    }

    fn caching(fetcher: Arc<StubFetcher>, store: Arc<dyn CacheStore + Send + Sync>) -> CachingFetcher {
        CachingFetcher::new(
            fetcher,
            store,
            Normalizer::new(LinkRewriter::xkcd()),
            "https://xkcd.com/atom.xml",
        )
    }

    #[tokio::test]
    async fn test_miss_fetches_and_stores() {
        let fetcher = Arc::new(StubFetcher::ok(UPSTREAM));
        let store = Arc::new(MemoryStore::new());
        let cf = caching(fetcher.clone(), store.clone());

        let feed = cf.get_feed().await.unwrap();

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(feed.id, "https://xkcd.com/");
        let cached = store.get(FEED_CACHE_KEY).unwrap().unwrap();
        assert_eq!(atom::parse(&cached).unwrap(), feed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_skips_fetch() {
        let fetcher = Arc::new(StubFetcher::ok(UPSTREAM));
        let cf = caching(fetcher.clone(), Arc::new(MemoryStore::new()));

        let first = cf.get_feed().await.unwrap();
        tokio::time::advance(Duration::from_secs(4 * 60 + 59)).await;
        let second = cf.get_feed().await.unwrap();

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_again_after_ttl() {
        let fetcher = Arc::new(StubFetcher::ok(UPSTREAM));
        let cf = caching(fetcher.clone(), Arc::new(MemoryStore::new()));

        cf.get_feed().await.unwrap();
        tokio::time::advance(FEED_CACHE_TTL).await;
        cf.get_feed().await.unwrap();

        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_upstream_status_is_propagated_and_not_cached() {
        let fetcher = Arc::new(StubFetcher::status(StatusCode::SERVICE_UNAVAILABLE));
        let store = Arc::new(MemoryStore::new());
        let cf = caching(fetcher.clone(), store.clone());

        let result = cf.get_feed().await;

        assert!(matches!(
            result,
            Err(CaptionFeedError::UpstreamStatus(StatusCode::SERVICE_UNAVAILABLE))
        ));
        assert_eq!(store.get(FEED_CACHE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_parse_failure_is_propagated_and_not_cached() {
        let fetcher = Arc::new(StubFetcher::ok("<feed><id>x</id>"));
        let store = Arc::new(MemoryStore::new());
        let cf = caching(fetcher, store.clone());

        assert!(matches!(cf.get_feed().await, Err(CaptionFeedError::Parse(_))));
        assert_eq!(store.get(FEED_CACHE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_an_error() {
        let fetcher = Arc::new(StubFetcher::ok(UPSTREAM));
        let store = Arc::new(MemoryStore::new());
        store
            .set(FEED_CACHE_KEY, b"not a feed", FEED_CACHE_TTL)
            .unwrap();
        let cf = caching(fetcher.clone(), store);

        let result = cf.get_feed().await;

        assert!(matches!(result, Err(CaptionFeedError::CacheCorruption(_))));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_write_failure_still_returns_feed() {
        let fetcher = Arc::new(StubFetcher::ok(UPSTREAM));
        let cf = caching(fetcher.clone(), Arc::new(ReadOnlyStore));

        let feed = cf.get_feed().await.unwrap();
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_fetch_independently() {
        let fetcher = Arc::new(StubFetcher {
            delay: Duration::from_millis(50),
            ..StubFetcher::ok(UPSTREAM)
        });
        let cf = caching(fetcher.clone(), Arc::new(MemoryStore::new()));

        let results = futures::future::join_all((0..4).map(|_| cf.get_feed())).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(fetcher.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_coalescing_fetches_once() {
        let fetcher = Arc::new(StubFetcher {
            delay: Duration::from_millis(50),
            ..StubFetcher::ok(UPSTREAM)
        });
        let cf = caching(fetcher.clone(), Arc::new(MemoryStore::new())).with_coalescing(true);

        let results = futures::future::join_all((0..4).map(|_| cf.get_feed())).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(fetcher.calls(), 1);
    }
}
