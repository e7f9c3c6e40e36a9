//! The read/delete contract the drain driver requires from a source store.

use octolog_types::{DayKey, SensorReading};

use crate::error::Result;

/// A store the drain driver can extract from.
///
/// [`Store`](crate::Store) implements this over SQLite;
/// [`MockStore`](crate::MockStore) implements it in memory for tests.
/// The driver must only call `purge_day` after the corresponding append
/// has been confirmed durable for both partitions.
pub trait SourceStore {
    /// All rows whose timestamp falls on `day`, in timestamp order.
    ///
    /// Returns an empty vector if there are none. Does not mutate the
    /// store.
    fn fetch_day(&self, day: DayKey) -> Result<Vec<SensorReading>>;

    /// Delete all rows whose timestamp falls on `day`.
    ///
    /// Returns the number of rows removed.
    fn purge_day(&self, day: DayKey) -> Result<usize>;
}
