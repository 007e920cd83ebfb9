use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{CaptionFeedError, Result};
use crate::store::{CacheEntry, CacheStore};

const MIGRATION_INITIAL: &str = "
CREATE TABLE cache_entries (
    key        TEXT PRIMARY KEY NOT NULL,
    value      BLOB NOT NULL,
    expires_at INTEGER NOT NULL
);
";

/// Cache backed by a SQLite file, so several processes can share one entry.
///
/// Expiry uses wall-clock milliseconds.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(MIGRATION_INITIAL)]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| CaptionFeedError::Cache(format!("migration failed: {}", e)))?;

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| CaptionFeedError::Cache(e.to_string()))
    }

    fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Drop every expired row. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM cache_entries WHERE expires_at <= ?1",
            params![Self::now_millis()],
        )?;
        Ok(removed)
    }
}

impl CacheStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.lock()?;

        let entry = conn
            .query_row(
                "SELECT value, expires_at FROM cache_entries WHERE key = ?1",
                params![key],
                |row| {
                    Ok(CacheEntry {
                        value: row.get(0)?,
                        expires_at: row.get::<_, i64>(1)?,
                    })
                },
            )
            .optional()?;

        Ok(entry
            .filter(|e| e.expires_at > Self::now_millis())
            .map(|e| e.value))
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = Self::now_millis().saturating_add(ttl_ms);

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO cache_entries (key, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
            params![key, value, expires_at],
        )?;

        Ok(())
    }
}
