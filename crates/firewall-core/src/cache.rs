use crate::error::{FirewallError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default time-to-live for cached registry lookups, in seconds.
pub const DEFAULT_TTL_SECONDS: u64 = 3600;

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// SQLite-backed cache for package registry metadata.
///
/// Mirrors a single-table key/value store with a `created_at` timestamp per
/// row; entries older than `ttl_seconds` are treated as absent and removed
/// on next access. The connection runs in WAL mode so readers and writers
/// don't block each other, and is guarded by a `Mutex` since `rusqlite`
/// connections aren't `Sync`.
///
/// # Examples
///
/// ```no_run
/// use firewall_core::cache::RegistryCache;
///
/// # fn example() -> firewall_core::error::Result<()> {
/// let cache = RegistryCache::open(std::path::Path::new("/tmp/firewall-cache"), 3600)?;
/// cache.set("pypi:exists:requests", &serde_json::json!(true))?;
/// assert_eq!(cache.get("pypi:exists:requests")?, Some(serde_json::json!(true)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RegistryCache {
    conn: Mutex<Connection>,
    ttl_seconds: u64,
}

impl RegistryCache {
    /// Opens (creating if necessary) a cache database under `cache_dir`.
    pub fn open(cache_dir: &Path, ttl_seconds: u64) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)?;
        let db_path = cache_dir.join("registry_cache.db");
        let conn = Connection::open(db_path)
            .map_err(|e| FirewallError::Cache(format!("failed to open cache db: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| FirewallError::Cache(format!("failed to set WAL mode: {e}")))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                created_at REAL NOT NULL
            )",
            [],
        )
        .map_err(|e| FirewallError::Cache(format!("failed to create cache table: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
            ttl_seconds,
        })
    }

    /// Opens an in-memory cache, useful for tests and short-lived CLI runs.
    pub fn open_in_memory(ttl_seconds: u64) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| FirewallError::Cache(format!("failed to open in-memory cache: {e}")))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                created_at REAL NOT NULL
            )",
            [],
        )
        .map_err(|e| FirewallError::Cache(format!("failed to create cache table: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
            ttl_seconds,
        })
    }

    /// Returns the cached value for `key`, or `None` if absent, expired, or corrupted.
    ///
    /// Expired and corrupted entries are deleted as a side effect, matching
    /// the lazy-eviction behavior of the reference cache.
    pub fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let row: Option<(String, f64)> = {
            let conn = self.conn.lock().unwrap();
            conn.query_row(
                "SELECT value, created_at FROM cache WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| FirewallError::Cache(format!("cache read failed: {e}")))?
        };

        let Some((value, created_at)) = row else {
            return Ok(None);
        };

        if now_secs() - created_at > self.ttl_seconds as f64 {
            self.delete(key)?;
            return Ok(None);
        }

        match serde_json::from_str(&value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                tracing::warn!(key, error = %e, "corrupted cache entry, removing");
                self.delete(key)?;
                Ok(None)
            }
        }
    }

    /// Stores `value` under `key`, overwriting any existing entry.
    pub fn set(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let serialized = serde_json::to_string(value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO cache (key, value, created_at) VALUES (?1, ?2, ?3)",
            params![key, serialized, now_secs()],
        )
        .map_err(|e| FirewallError::Cache(format!("cache write failed: {e}")))?;
        Ok(())
    }

    /// Removes `key` from the cache, if present.
    pub fn delete(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM cache WHERE key = ?1", params![key])
            .map_err(|e| FirewallError::Cache(format!("cache delete failed: {e}")))?;
        Ok(())
    }

    /// Removes all expired entries, returning how many rows were deleted.
    pub fn clear_expired(&self) -> Result<usize> {
        let cutoff = now_secs() - self.ttl_seconds as f64;
        let conn = self.conn.lock().unwrap();
        let removed = conn
            .execute("DELETE FROM cache WHERE created_at < ?1", params![cutoff])
            .map_err(|e| FirewallError::Cache(format!("cache prune failed: {e}")))?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_roundtrip() {
        let cache = RegistryCache::open_in_memory(3600).unwrap();
        cache.set("pypi:exists:requests", &serde_json::json!(true)).unwrap();
        assert_eq!(
            cache.get("pypi:exists:requests").unwrap(),
            Some(serde_json::json!(true))
        );
    }

    #[test]
    fn test_get_missing_key() {
        let cache = RegistryCache::open_in_memory(3600).unwrap();
        assert_eq!(cache.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_expired_entry_evicted() {
        let cache = RegistryCache::open_in_memory(0).unwrap();
        cache.set("pypi:exists:numpy", &serde_json::json!(true)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert_eq!(cache.get("pypi:exists:numpy").unwrap(), None);
    }

    #[test]
    fn test_delete() {
        let cache = RegistryCache::open_in_memory(3600).unwrap();
        cache.set("key", &serde_json::json!("value")).unwrap();
        cache.delete("key").unwrap();
        assert_eq!(cache.get("key").unwrap(), None);
    }

    #[test]
    fn test_clear_expired_counts_removed_rows() {
        let cache = RegistryCache::open_in_memory(0).unwrap();
        cache.set("a", &serde_json::json!(1)).unwrap();
        cache.set("b", &serde_json::json!(2)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert_eq!(cache.clear_expired().unwrap(), 2);
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let cache = RegistryCache::open_in_memory(3600).unwrap();
        cache.set("key", &serde_json::json!(1)).unwrap();
        cache.set("key", &serde_json::json!(2)).unwrap();
        assert_eq!(cache.get("key").unwrap(), Some(serde_json::json!(2)));
    }
}
