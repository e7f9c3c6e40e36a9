//! Polling drain service for octolog sensor data.
//!
//! This crate provides the long-running process that:
//! - Polls the source store on a fixed interval
//! - Assigns gapless per-partition identifiers to the fetched rows
//! - Appends them durably to the daily and monthly CSV partitions
//! - Purges the source rows only after both appends succeeded
//! - Detects day/month rollover and routes writes to the new files
//!
//! A single bad cycle never terminates the process: errors are logged at
//! the cycle boundary and the loop continues on the next tick.
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/octolog/service.toml`:
//!
//! ```toml
//! [storage]
//! path = "~/.local/share/octolog/data.db"
//!
//! [archive]
//! dir = "~/.local/share/octolog/archive"
//!
//! [drain]
//! poll_interval = 240
//! ```

pub mod clock;
pub mod config;
pub mod drain;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ArchiveConfig, Config, ConfigError, DrainConfig, StorageConfig};
pub use drain::{CycleReport, DrainError, Drainer};
