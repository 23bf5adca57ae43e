//! SQLite-backed JSON response cache with per-entry expiry.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const TTL_REPOS: u64 = 600;
pub const TTL_RFC_LIST: u64 = 300;
pub const TTL_COMMENT_COUNT: u64 = 300;
pub const TTL_CONTENT: u64 = 60;
pub const TTL_USER: u64 = 3600;

pub struct ResponseCache {
    conn: Connection,
}

impl ResponseCache {
    /// Open (or create) the cache database at `path`, dropping entries that
    /// expired since the last run.
    pub fn open(path: &Path) -> Result<Self> {
        let cache = Self::open_unpurged(path)?;
        let purged = cache.purge_expired()?;
        if purged > 0 {
            debug!("Purged {purged} expired cache entries");
        }
        Ok(cache)
    }

    fn open_unpurged(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open cache database: {}", path.display()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory cache")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER
            )",
        )
        .context("Failed to create cache table")?;
        Ok(Self { conn })
    }

    /// Cached value for `key`, or `None` when missing or expired.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get_json_at(key, Utc::now().timestamp())
    }

    fn get_json_at<T: DeserializeOwned>(&self, key: &str, now: i64) -> Result<Option<T>> {
        let row: Option<(String, Option<i64>)> = self
            .conn
            .query_row(
                "SELECT value, expires_at FROM cache WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .with_context(|| format!("Failed to read cache entry {key}"))?;

        let Some((value, expires_at)) = row else {
            return Ok(None);
        };
        if expires_at.is_some_and(|at| at <= now) {
            return Ok(None);
        }
        let parsed = serde_json::from_str(&value)
            .with_context(|| format!("Failed to parse cache entry {key}"))?;
        Ok(Some(parsed))
    }

    /// Store `value` under `key` for `ttl_secs` seconds (0 = no expiry).
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_secs: u64) -> Result<()> {
        self.set_json_at(key, value, ttl_secs, Utc::now().timestamp())
    }

    fn set_json_at<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
        now: i64,
    ) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let expires_at = (ttl_secs > 0)
            .then(|| i64::try_from(ttl_secs).map_or(i64::MAX, |ttl| now.saturating_add(ttl)));
        self.conn
            .execute(
                "INSERT INTO cache (key, value, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
                params![key, json, expires_at],
            )
            .with_context(|| format!("Failed to write cache entry {key}"))?;
        Ok(())
    }

    /// Delete expired rows. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        self.purge_expired_at(Utc::now().timestamp())
    }

    fn purge_expired_at(&self, now: i64) -> Result<usize> {
        self.conn
            .execute(
                "DELETE FROM cache WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                params![now],
            )
            .context("Failed to purge cache")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_then_hit() {
        let cache = ResponseCache::open_in_memory().expect("open");
        assert_eq!(cache.get_json::<String>("user").expect("get"), None);
        cache.set_json("user", "alice", TTL_USER).expect("set");
        assert_eq!(
            cache.get_json::<String>("user").expect("get"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn entries_expire() {
        let cache = ResponseCache::open_in_memory().expect("open");
        cache.set_json_at("k", &42u32, 60, 1_000).expect("set");
        assert_eq!(cache.get_json_at::<u32>("k", 1_059).expect("get"), Some(42));
        assert_eq!(cache.get_json_at::<u32>("k", 1_060).expect("get"), None);
    }

    #[test]
    fn zero_ttl_never_expires() {
        let cache = ResponseCache::open_in_memory().expect("open");
        cache.set_json_at("k", &vec![1, 2], 0, 1_000).expect("set");
        assert_eq!(
            cache.get_json_at::<Vec<i32>>("k", i64::MAX).expect("get"),
            Some(vec![1, 2])
        );
    }

    #[test]
    fn set_overwrites() {
        let cache = ResponseCache::open_in_memory().expect("open");
        cache.set_json_at("k", "a", 10, 0).expect("set");
        cache.set_json_at("k", "b", 10, 0).expect("set");
        assert_eq!(
            cache.get_json_at::<String>("k", 5).expect("get"),
            Some("b".to_string())
        );
    }

    #[test]
    fn purge_removes_only_expired() {
        let cache = ResponseCache::open_in_memory().expect("open");
        cache.set_json_at("old", "x", 10, 0).expect("set");
        cache.set_json_at("new", "y", 100, 0).expect("set");
        cache.set_json_at("forever", "z", 0, 0).expect("set");
        assert_eq!(cache.purge_expired_at(50).expect("purge"), 1);
        assert_eq!(cache.get_json_at::<String>("new", 50).expect("get"), Some("y".to_string()));
    }

    #[test]
    fn reopening_drops_expired_entries() {
        let dir = std::env::temp_dir().join(format!("rfc-ui-cache-test-{}", std::process::id()));
        let path = dir.join("cache.db");
        {
            let cache = ResponseCache::open_unpurged(&path).expect("open");
            cache.set_json_at("stale", "x", 10, 0).expect("set");
            cache.set_json("fresh", "y", 600).expect("set");
        }

        let cache = ResponseCache::open(&path).expect("reopen");
        let rows: i64 = cache
            .conn
            .query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))
            .expect("count");
        assert_eq!(rows, 1);
        assert_eq!(cache.get_json::<String>("fresh").expect("get"), Some("y".to_string()));
        drop(cache);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_entry_is_an_error() {
        let cache = ResponseCache::open_in_memory().expect("open");
        cache.set_json_at("k", "text", 0, 0).expect("set");
        assert!(cache.get_json_at::<u32>("k", 0).is_err());
    }
}
