//! Append-only daily/monthly CSV partition files for octolog.
//!
//! The archive manages two parallel partitions of the drained sensor
//! data: one file per calendar day and one per calendar month. Files are
//! created lazily on first append, get their header exactly once, and are
//! never rewritten or truncated — only appended. Identifier sequences are
//! recovered from the files themselves, so a restarted process continues
//! where the previous one stopped.
//!
//! Concurrent readers (the dashboard) may observe a prefix of a file that
//! is being appended to; each batch lands as a single write of fully
//! serialized rows.
//!
//! # Example
//!
//! ```no_run
//! use octolog_archive::Archive;
//! use octolog_types::{DayKey, PartitionRecord, SensorReading};
//! use time::macros::{date, datetime};
//!
//! let archive = Archive::new("/var/lib/octolog/archive");
//! let day = DayKey::new(date!(2024-01-05));
//!
//! let reading = SensorReading::new(datetime!(2024-01-05 00:00:01 UTC), [0.5; 8]);
//! let next_id = archive.recover_daily_max(&day)? + 1;
//! archive.append_daily(&day, &[PartitionRecord::new(&reading, next_id, next_id)])?;
//! # Ok::<(), octolog_archive::Error>(())
//! ```

mod archive;
mod error;

pub use archive::Archive;
pub use error::{Error, Result};
