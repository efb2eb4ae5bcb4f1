//! Persistent distance cache
//!
//! SQLite-backed store mapping ordered coordinate pairs to resolved road
//! distances. Entries are written once on first successful resolution and
//! read thereafter; nothing in this module deletes them.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::core::error::Result;

/// Ordered coordinate-pair key for a cached distance.
///
/// Order-sensitive: `(A, B)` and `(B, A)` are distinct keys. Road distance
/// is not symmetric in general (one-way streets), so the two directions are
/// cached independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairKey {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

impl PairKey {
    pub fn new(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Self {
        Self { lat1, lon1, lat2, lon2 }
    }
}

/// Persistent key -> meters store for resolved road distances.
///
/// The connection is opened once and held for the cache's lifetime; every
/// exit path of a resolution shares the same handle.
pub struct DistanceCache {
    conn: Mutex<Connection>,
}

impl DistanceCache {
    /// Open (or create) the cache database at `path` and initialize the
    /// schema. Initialization is idempotent; re-opening an existing cache
    /// leaves its rows untouched.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Look up a previously resolved distance in meters. Pure read, no side
    /// effects.
    pub fn get(&self, key: &PairKey) -> Result<Option<f64>> {
        let conn = self.conn.lock().expect("cache mutex poisoned");
        let mut stmt = conn.prepare_cached(
            "SELECT distance FROM distances
             WHERE lat1 = ?1 AND lon1 = ?2 AND lat2 = ?3 AND lon2 = ?4",
        )?;
        let meters = stmt
            .query_row(params![key.lat1, key.lon1, key.lat2, key.lon2], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(meters)
    }

    /// Insert a resolved distance if the key is absent, then read back the
    /// stored value.
    ///
    /// The insert is `INSERT OR IGNORE` under the unique coordinate index,
    /// so concurrent writers for the same key converge: the first insert
    /// wins and every caller returns the winner's value. Callers must treat
    /// the returned meters as authoritative, not their own argument.
    pub fn put(&self, key: &PairKey, meters: f64) -> Result<f64> {
        let conn = self.conn.lock().expect("cache mutex poisoned");
        let mut insert = conn.prepare_cached(
            "INSERT OR IGNORE INTO distances (lat1, lon1, lat2, lon2, distance)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        insert.execute(params![key.lat1, key.lon1, key.lat2, key.lon2, meters])?;

        let mut select = conn.prepare_cached(
            "SELECT distance FROM distances
             WHERE lat1 = ?1 AND lon1 = ?2 AND lat2 = ?3 AND lon2 = ?4",
        )?;
        let stored =
            select.query_row(params![key.lat1, key.lon1, key.lat2, key.lon2], |row| {
                row.get(0)
            })?;
        Ok(stored)
    }

    /// Number of cached entries.
    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("cache mutex poisoned");
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM distances", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// True when no distance has been cached yet.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Create the distance table and its unique coordinate index if absent.
fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS distances (
             lat1 REAL NOT NULL,
             lon1 REAL NOT NULL,
             lat2 REAL NOT NULL,
             lon2 REAL NOT NULL,
             distance REAL NOT NULL
         );
         CREATE UNIQUE INDEX IF NOT EXISTS idx_distances_pair
             ON distances (lat1, lon1, lat2, lon2);",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn temp_cache() -> (tempfile::TempDir, DistanceCache) {
        let dir = tempdir().unwrap();
        let cache = DistanceCache::open(dir.path().join("distances.db")).unwrap();
        (dir, cache)
    }

    #[test]
    fn test_get_absent_key() {
        let (_dir, cache) = temp_cache();
        let key = PairKey::new(52.52, 13.405, 52.53, 13.41);
        assert_eq!(cache.get(&key).unwrap(), None);
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_put_then_get() {
        let (_dir, cache) = temp_cache();
        let key = PairKey::new(52.52, 13.405, 52.53, 13.41);

        assert_eq!(cache.put(&key, 3200.0).unwrap(), 3200.0);
        assert_eq!(cache.get(&key).unwrap(), Some(3200.0));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_put_is_insert_if_absent() {
        let (_dir, cache) = temp_cache();
        let key = PairKey::new(52.52, 13.405, 52.53, 13.41);

        cache.put(&key, 3200.0).unwrap();
        // A losing duplicate writer gets the winner's value back
        assert_eq!(cache.put(&key, 9999.0).unwrap(), 3200.0);
        assert_eq!(cache.get(&key).unwrap(), Some(3200.0));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_keys_are_directional() {
        let (_dir, cache) = temp_cache();
        let forward = PairKey::new(52.52, 13.405, 52.53, 13.41);
        let backward = PairKey::new(52.53, 13.41, 52.52, 13.405);

        cache.put(&forward, 3200.0).unwrap();
        assert_eq!(cache.get(&backward).unwrap(), None);

        cache.put(&backward, 3350.0).unwrap();
        assert_eq!(cache.len().unwrap(), 2);
        assert_eq!(cache.get(&forward).unwrap(), Some(3200.0));
        assert_eq!(cache.get(&backward).unwrap(), Some(3350.0));
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("distances.db");
        let key = PairKey::new(52.52, 13.405, 52.53, 13.41);

        {
            let cache = DistanceCache::open(&path).unwrap();
            cache.put(&key, 3200.0).unwrap();
        }

        // Schema init on an existing database must not disturb stored rows
        let cache = DistanceCache::open(&path).unwrap();
        assert_eq!(cache.get(&key).unwrap(), Some(3200.0));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_open_fails_on_unwritable_path() {
        let result = DistanceCache::open("/nonexistent-dir/distances.db");
        assert!(result.is_err());
    }
}
