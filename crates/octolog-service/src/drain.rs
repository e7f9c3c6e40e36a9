//! The drain cycle: fetch → transform → append → purge.
//!
//! One cycle moves everything the source store holds for the current day
//! into the daily and monthly partitions, then deletes it from the store.
//! Ordering is what makes this crash-safe:
//!
//! - Identifiers are recovered from the partition files at the start of
//!   every cycle, so a restart (or a failed append) can never reuse an id.
//! - The purge runs only after both appends are durable. A crash or purge
//!   failure before that point re-delivers the same rows next cycle with
//!   fresh, higher ids — duplicates are accepted over data loss.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use octolog_archive::Archive;
use octolog_store::SourceStore;
use octolog_types::{PartitionKeys, PartitionRecord};

use crate::clock::Clock;

/// What a single drain cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Rows appended to both partitions this cycle.
    pub drained: usize,
    /// Rows removed from the source store.
    pub purged: usize,
    /// The purge failed after a successful append; the rows will be
    /// re-delivered with fresh ids next cycle.
    pub purge_failed: bool,
}

/// Drain cycle errors.
#[derive(Debug, thiserror::Error)]
pub enum DrainError {
    #[error("Failed to fetch readings: {0}")]
    Fetch(octolog_store::Error),
    #[error("Failed to recover partition ids: {0}")]
    Recover(octolog_archive::Error),
    #[error("Failed to append partition rows: {0}")]
    Append(octolog_archive::Error),
}

/// The polling driver.
///
/// Holds the source store, the partition archive, the remembered
/// partition keys, and the clock. [`run_cycle`](Self::run_cycle) is one
/// synchronous pass; [`run`] wraps it in the forever loop.
pub struct Drainer<S, C> {
    store: S,
    archive: Archive,
    keys: PartitionKeys,
    clock: C,
}

impl<S: SourceStore, C: Clock> Drainer<S, C> {
    /// Create a driver; the remembered keys start at the clock's current day.
    pub fn new(store: S, archive: Archive, clock: C) -> Self {
        let keys = PartitionKeys::at(clock.now());
        Self {
            store,
            archive,
            keys,
            clock,
        }
    }

    /// The source store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The partition archive.
    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// The partition keys the driver currently routes writes to.
    pub fn partition_keys(&self) -> PartitionKeys {
        self.keys
    }

    /// Run one drain cycle.
    ///
    /// Safe to call again after any error: the next cycle re-fetches the
    /// unchanged source rows and re-recovers the id sequences.
    pub fn run_cycle(&mut self) -> Result<CycleReport, DrainError> {
        let keys = PartitionKeys::at(self.clock.now());
        if keys.day != self.keys.day {
            info!("Rotating partitions: {} -> {}", self.keys.day, keys.day);
            self.keys = keys;
        }
        let day = self.keys.day;
        let month = self.keys.month;

        let readings = self.store.fetch_day(day).map_err(DrainError::Fetch)?;
        if readings.is_empty() {
            debug!("No rows to drain for {}", day);
            return Ok(CycleReport::default());
        }

        // Assign both id sequences from the same ordered batch: row i gets
        // the i-th id of each sequence.
        let next_daily = self
            .archive
            .recover_daily_max(&day)
            .map_err(DrainError::Recover)?
            + 1;
        let next_monthly = self
            .archive
            .recover_monthly_max(&month)
            .map_err(DrainError::Recover)?
            + 1;
        let records: Vec<PartitionRecord> = readings
            .iter()
            .enumerate()
            .map(|(i, reading)| {
                PartitionRecord::new(reading, next_daily + i as u64, next_monthly + i as u64)
            })
            .collect();

        // Daily first, then monthly; abort (and skip the purge) if either
        // fails, so the source rows survive for the next tick.
        self.archive
            .append_daily(&day, &records)
            .map_err(DrainError::Append)?;
        self.archive
            .append_monthly(&month, &records)
            .map_err(DrainError::Append)?;

        let mut report = CycleReport {
            drained: records.len(),
            ..CycleReport::default()
        };
        match self.store.purge_day(day) {
            Ok(purged) => report.purged = purged,
            Err(err) => {
                // Rows stay in the store and will be re-appended with
                // fresh ids next cycle: duplicates, never data loss.
                warn!(
                    "Purge failed for {} after successful append, expect duplicate rows: {}",
                    day, err
                );
                report.purge_failed = true;
            }
        }

        Ok(report)
    }
}

/// Drive cycles forever at the given interval.
///
/// A failed cycle is logged and the loop continues; only process
/// termination stops it.
pub async fn run<S: SourceStore, C: Clock>(mut drainer: Drainer<S, C>, poll_interval: Duration) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match drainer.run_cycle() {
            Ok(report) if report.drained > 0 => {
                info!(
                    "Drained {} rows into {} ({} purged)",
                    report.drained,
                    drainer.partition_keys().day,
                    report.purged
                );
            }
            Ok(_) => {}
            Err(err) => {
                error!("Drain cycle failed, retrying next tick: {}", err);
            }
        }
    }
}
