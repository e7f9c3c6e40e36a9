//! Mock source store for testing.
//!
//! Implements [`SourceStore`] over an in-memory row set so drain-cycle
//! behavior can be exercised without a database.
//!
//! # Features
//!
//! - **Failure injection**: arm the next fetch or purge to fail, to drive
//!   the abort-and-retry paths of the drain cycle
//! - **Call counting**: assert how many fetches/purges a scenario performed

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use octolog_types::{DayKey, SensorReading};

use crate::error::{Error, Result};
use crate::traits::SourceStore;

/// An in-memory source store for testing.
///
/// # Example
///
/// ```
/// use octolog_store::{MockStore, SourceStore};
/// use octolog_types::{DayKey, SensorReading};
/// use time::macros::{date, datetime};
///
/// let store = MockStore::new();
/// store.push(SensorReading::new(datetime!(2024-01-05 00:00:01 UTC), [0.5; 8]));
///
/// store.fail_next_purge();
/// assert!(store.purge_day(DayKey::new(date!(2024-01-05))).is_err());
/// // The rows are still there; the next purge succeeds.
/// assert_eq!(store.purge_day(DayKey::new(date!(2024-01-05))).unwrap(), 1);
/// ```
#[derive(Default)]
pub struct MockStore {
    rows: Mutex<Vec<SensorReading>>,
    fail_next_fetch: AtomicBool,
    fail_next_purge: AtomicBool,
    fetch_count: AtomicU32,
    purge_count: AtomicU32,
}

impl MockStore {
    /// Create an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reading to the store.
    pub fn push(&self, reading: SensorReading) {
        self.rows.lock().unwrap().push(reading);
    }

    /// Add several readings to the store.
    pub fn extend(&self, readings: impl IntoIterator<Item = SensorReading>) {
        self.rows.lock().unwrap().extend(readings);
    }

    /// Total rows currently in the store, across all days.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Arm the next `fetch_day` call to fail.
    pub fn fail_next_fetch(&self) {
        self.fail_next_fetch.store(true, Ordering::SeqCst);
    }

    /// Arm the next `purge_day` call to fail.
    pub fn fail_next_purge(&self) {
        self.fail_next_purge.store(true, Ordering::SeqCst);
    }

    /// Number of `fetch_day` calls made (including failed ones).
    #[must_use]
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Number of `purge_day` calls made (including failed ones).
    #[must_use]
    pub fn purge_count(&self) -> u32 {
        self.purge_count.load(Ordering::SeqCst)
    }
}

impl SourceStore for MockStore {
    fn fetch_day(&self, day: DayKey) -> Result<Vec<SensorReading>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_fetch.swap(false, Ordering::SeqCst) {
            return Err(Error::Unavailable("injected fetch failure".to_string()));
        }

        let mut matching: Vec<SensorReading> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.timestamp.date() == day.date())
            .copied()
            .collect();
        matching.sort_by_key(|r| r.timestamp);
        Ok(matching)
    }

    fn purge_day(&self, day: DayKey) -> Result<usize> {
        self.purge_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_purge.swap(false, Ordering::SeqCst) {
            return Err(Error::Unavailable("injected purge failure".to_string()));
        }

        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.timestamp.date() != day.date());
        Ok(before - rows.len())
    }
}
