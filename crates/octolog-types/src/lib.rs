//! Core types for octolog eight-channel sensor data.
//!
//! This crate holds the data model shared by the source store, the
//! partition archive, and the drain service:
//!
//! - **Readings**: one timestamped row of the eight ADC channels
//! - **Partition records**: a reading enriched with its MJD epoch value
//!   and the per-partition identifiers assigned at drain time
//! - **Partition keys**: the day/month keys that route rows to files
//! - **MJD conversion**: fractional day count since 1858-11-17
//!
//! # Example
//!
//! ```
//! use octolog_types::{PartitionKeys, SensorReading, mjd};
//! use time::macros::datetime;
//!
//! let reading = SensorReading::new(datetime!(2024-01-05 00:00:01 UTC), [0.5; 8]);
//! let keys = PartitionKeys::at(reading.timestamp);
//!
//! assert_eq!(keys.day.to_string(), "2024-01-05");
//! assert!(mjd::epoch_value(reading.timestamp) > 60314.0);
//! ```

pub mod mjd;
pub mod partition;
pub mod reading;

pub use partition::{DayKey, MonthKey, PartitionKeys};
pub use reading::{CHANNEL_NAMES, PartitionRecord, SensorReading};
