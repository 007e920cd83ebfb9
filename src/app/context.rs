use std::sync::Arc;

use crate::app::error::Result;
use crate::config::{CacheBackend, Config};
use crate::fetcher::{CachingFetcher, Fetcher, HttpFetcher};
use crate::normalizer::{LinkRewriter, Normalizer};
use crate::store::{CacheStore, MemoryStore, SqliteStore};

/// Wires the fetch pipeline together from a [`Config`].
pub struct AppContext {
    pub config: Config,
    pub feeds: CachingFetcher,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.upstream)?);
        let store = Self::open_store(&config)?;
        Self::with_parts(config, fetcher, store)
    }

    /// Build a context around an explicit fetcher and store.
    pub fn with_parts(
        config: Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        store: Arc<dyn CacheStore + Send + Sync>,
    ) -> Result<Self> {
        let rewriter = LinkRewriter::new(
            &config.rewrite.host,
            config.rewrite.subdomain.as_deref(),
        )?;
        let feeds = CachingFetcher::new(
            fetcher,
            store,
            Normalizer::new(rewriter),
            config.upstream.url.clone(),
        )
        .with_coalescing(config.cache.coalesce);

        Ok(Self { config, feeds })
    }

    fn open_store(config: &Config) -> Result<Arc<dyn CacheStore + Send + Sync>> {
        match config.cache.backend {
            CacheBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            CacheBackend::Sqlite => {
                let path = match &config.cache.path {
                    Some(p) => p.clone(),
                    None => Config::default_cache_path()?,
                };
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                let store = SqliteStore::new(&path)?;
                let purged = store.purge_expired()?;
                tracing::debug!("Opened cache at {} ({} expired entries removed)", path.display(), purged);
                Ok(Arc::new(store))
            }
        }
    }
}
