pub mod memory;
pub mod sqlite;

use std::time::Duration;

use crate::app::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key under which the serialized feed is cached.
pub const FEED_CACHE_KEY: &str = "/xkcd.atom";

/// How long a cached feed stays fresh.
pub const FEED_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// A key/value store with per-entry expiry.
///
/// `get` and `set` are each atomic for a single key. Expired entries read
/// as misses.
pub trait CacheStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;
}

/// A stored value together with the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: Vec<u8>,
    pub expires_at: T,
}
