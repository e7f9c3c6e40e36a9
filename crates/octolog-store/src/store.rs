//! Main store implementation.

use std::path::Path;

use rusqlite::Connection;
use time::OffsetDateTime;
use tracing::{debug, info};

use octolog_types::{DayKey, SensorReading};

use crate::error::{Error, Result};
use crate::schema;
use crate::traits::SourceStore;

/// SQLite-based store for posted sensor rows.
///
/// The connection is an explicitly owned handle: open it once, hand the
/// store to whoever drains it. No process-global state.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL mode so the ingest side and the drain side don't block each other
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        // Initialize schema
        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Insert a single reading. Returns the new row id.
    pub fn insert_reading(&self, reading: &SensorReading) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sensordata (timestamp, x1, x2, y1, y2, d1, d2, z1, z2)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                reading.timestamp.unix_timestamp(),
                reading.x1,
                reading.x2,
                reading.y1,
                reading.y2,
                reading.d1,
                reading.d2,
                reading.z1,
                reading.z2,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a batch of readings in one transaction.
    pub fn insert_readings(&mut self, readings: &[SensorReading]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO sensordata (timestamp, x1, x2, y1, y2, d1, d2, z1, z2)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for reading in readings {
                stmt.execute(rusqlite::params![
                    reading.timestamp.unix_timestamp(),
                    reading.x1,
                    reading.x2,
                    reading.y1,
                    reading.y2,
                    reading.d1,
                    reading.d2,
                    reading.z1,
                    reading.z2,
                ])?;
            }
        }
        tx.commit()?;

        Ok(readings.len())
    }

    /// Count rows whose timestamp falls on `day`.
    pub fn count_day(&self, day: DayKey) -> Result<u64> {
        let (start, end) = day_bounds(day);
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sensordata WHERE timestamp >= ?1 AND timestamp < ?2",
            [start, end],
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }
}

impl SourceStore for Store {
    fn fetch_day(&self, day: DayKey) -> Result<Vec<SensorReading>> {
        let (start, end) = day_bounds(day);

        let mut stmt = self.conn.prepare(
            "SELECT timestamp, x1, x2, y1, y2, d1, d2, z1, z2
             FROM sensordata
             WHERE timestamp >= ?1 AND timestamp < ?2
             ORDER BY timestamp, id",
        )?;

        let mut readings = Vec::new();
        let mut rows = stmt.query([start, end])?;
        while let Some(row) = rows.next()? {
            let seconds: i64 = row.get(0)?;
            let timestamp = OffsetDateTime::from_unix_timestamp(seconds)
                .map_err(|_| Error::InvalidTimestamp(seconds))?;
            readings.push(SensorReading {
                timestamp,
                x1: row.get(1)?,
                x2: row.get(2)?,
                y1: row.get(3)?,
                y2: row.get(4)?,
                d1: row.get(5)?,
                d2: row.get(6)?,
                z1: row.get(7)?,
                z2: row.get(8)?,
            });
        }

        debug!("Fetched {} rows for {}", readings.len(), day);
        Ok(readings)
    }

    fn purge_day(&self, day: DayKey) -> Result<usize> {
        let (start, end) = day_bounds(day);
        let removed = self.conn.execute(
            "DELETE FROM sensordata WHERE timestamp >= ?1 AND timestamp < ?2",
            [start, end],
        )?;

        debug!("Purged {} rows for {}", removed, day);
        Ok(removed)
    }
}

/// Half-open unix-second range `[midnight, next midnight)` for a day.
fn day_bounds(day: DayKey) -> (i64, i64) {
    let start = day.date().midnight().assume_utc().unix_timestamp();
    (start, start + 86_400)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn reading_at(timestamp: OffsetDateTime, fill: f64) -> SensorReading {
        SensorReading::new(timestamp, [fill; 8])
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        let day = DayKey::new(date!(2024-01-05));
        assert_eq!(store.count_day(day).unwrap(), 0);
        assert!(store.fetch_day(day).unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_fetch_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let reading = reading_at(datetime!(2024-01-05 00:00:01 UTC), 0.25);

        store.insert_reading(&reading).unwrap();

        let fetched = store.fetch_day(DayKey::new(date!(2024-01-05))).unwrap();
        assert_eq!(fetched, vec![reading]);
    }

    #[test]
    fn test_fetch_is_bounded_to_the_day() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .insert_readings(&[
                reading_at(datetime!(2024-01-04 23:59:59 UTC), 1.0),
                reading_at(datetime!(2024-01-05 00:00:00 UTC), 2.0),
                reading_at(datetime!(2024-01-05 23:59:59 UTC), 3.0),
                reading_at(datetime!(2024-01-06 00:00:00 UTC), 4.0),
            ])
            .unwrap();

        let fetched = store.fetch_day(DayKey::new(date!(2024-01-05))).unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].x1, 2.0);
        assert_eq!(fetched[1].x1, 3.0);
    }

    #[test]
    fn test_fetch_orders_by_timestamp() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_reading(&reading_at(datetime!(2024-01-05 00:00:03 UTC), 3.0))
            .unwrap();
        store
            .insert_reading(&reading_at(datetime!(2024-01-05 00:00:01 UTC), 1.0))
            .unwrap();
        store
            .insert_reading(&reading_at(datetime!(2024-01-05 00:00:02 UTC), 2.0))
            .unwrap();

        let fetched = store.fetch_day(DayKey::new(date!(2024-01-05))).unwrap();
        let values: Vec<f64> = fetched.iter().map(|r| r.x1).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_purge_leaves_other_days_untouched() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .insert_readings(&[
                reading_at(datetime!(2024-01-05 08:00:00 UTC), 1.0),
                reading_at(datetime!(2024-01-05 09:00:00 UTC), 2.0),
                reading_at(datetime!(2024-01-06 08:00:00 UTC), 3.0),
            ])
            .unwrap();

        let removed = store.purge_day(DayKey::new(date!(2024-01-05))).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count_day(DayKey::new(date!(2024-01-05))).unwrap(), 0);
        assert_eq!(store.count_day(DayKey::new(date!(2024-01-06))).unwrap(), 1);
    }

    #[test]
    fn test_purge_empty_day_is_a_noop() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.purge_day(DayKey::new(date!(2024-01-05))).unwrap(), 0);
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");
        let store = Store::open(&path).unwrap();
        store
            .insert_reading(&reading_at(datetime!(2024-01-05 00:00:01 UTC), 0.5))
            .unwrap();
        assert!(path.exists());
    }
}
