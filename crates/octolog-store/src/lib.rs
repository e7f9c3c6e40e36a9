//! Transactional source store for octolog sensor readings.
//!
//! Sensors post rows into a SQLite table; the drain service reads them
//! back a day at a time and deletes what it has durably archived. The
//! store's remaining rows for a date are therefore exactly the undrained
//! tail — there is no separate cursor.
//!
//! The drain driver depends only on the [`SourceStore`] trait, so tests
//! can substitute [`MockStore`] (with failure injection) for a real
//! database.
//!
//! # Example
//!
//! ```
//! use octolog_store::{SourceStore, Store};
//! use octolog_types::{DayKey, SensorReading};
//! use time::macros::{date, datetime};
//!
//! let store = Store::open_in_memory()?;
//! store.insert_reading(&SensorReading::new(datetime!(2024-01-05 00:00:01 UTC), [0.5; 8]))?;
//!
//! let day = DayKey::new(date!(2024-01-05));
//! assert_eq!(store.fetch_day(day)?.len(), 1);
//! assert_eq!(store.purge_day(day)?, 1);
//! # Ok::<(), octolog_store::Error>(())
//! ```

mod error;
pub mod mock;
mod schema;
mod store;
mod traits;

pub use error::{Error, Result};
pub use mock::MockStore;
pub use store::Store;
pub use traits::SourceStore;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/octolog/data.db`
/// - macOS: `~/Library/Application Support/octolog/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\octolog\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("octolog")
        .join("data.db")
}
