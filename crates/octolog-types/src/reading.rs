//! Sensor readings and the partition record they become at drain time.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::mjd;

/// Names of the eight ADC channels, in column order.
pub const CHANNEL_NAMES: [&str; 8] = ["X1", "X2", "Y1", "Y2", "D1", "D2", "Z1", "Z2"];

/// One row from the source store: a capture timestamp plus the fixed set
/// of ADC channel values. Immutable once read; exists only in transit
/// between the source store and a partition file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// When the sample was captured (UTC, second precision from the store).
    pub timestamp: OffsetDateTime,
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub d1: f64,
    pub d2: f64,
    pub z1: f64,
    pub z2: f64,
}

impl SensorReading {
    /// Create a reading from channel values in [`CHANNEL_NAMES`] order.
    #[must_use]
    pub fn new(timestamp: OffsetDateTime, channels: [f64; 8]) -> Self {
        let [x1, x2, y1, y2, d1, d2, z1, z2] = channels;
        Self {
            timestamp,
            x1,
            x2,
            y1,
            y2,
            d1,
            d2,
            z1,
            z2,
        }
    }

    /// Channel values in [`CHANNEL_NAMES`] order.
    #[must_use]
    pub fn channel_values(&self) -> [f64; 8] {
        [
            self.x1, self.x2, self.y1, self.y2, self.d1, self.d2, self.z1, self.z2,
        ]
    }
}

/// One line of a partition file: a reading plus its derived MJD epoch
/// value and the identifiers assigned within each partition.
///
/// Within one append batch to a partition, `daily_id` (resp. `monthly_id`)
/// values form a contiguous ascending run starting at the partition's
/// previous maximum + 1, or at 1 for a fresh file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionRecord {
    #[serde(with = "csv_timestamp")]
    pub timestamp: OffsetDateTime,
    #[serde(rename = "X1")]
    pub x1: f64,
    #[serde(rename = "X2")]
    pub x2: f64,
    #[serde(rename = "Y1")]
    pub y1: f64,
    #[serde(rename = "Y2")]
    pub y2: f64,
    #[serde(rename = "D1")]
    pub d1: f64,
    #[serde(rename = "D2")]
    pub d2: f64,
    #[serde(rename = "Z1")]
    pub z1: f64,
    #[serde(rename = "Z2")]
    pub z2: f64,
    /// Fractional days since the MJD epoch, derived from `timestamp`.
    pub mjd: f64,
    /// Identifier within the daily partition.
    pub daily_id: u64,
    /// Identifier within the monthly partition.
    pub monthly_id: u64,
}

impl PartitionRecord {
    /// Enrich a reading with its epoch value and the assigned identifiers.
    #[must_use]
    pub fn new(reading: &SensorReading, daily_id: u64, monthly_id: u64) -> Self {
        Self {
            timestamp: reading.timestamp,
            x1: reading.x1,
            x2: reading.x2,
            y1: reading.y1,
            y2: reading.y2,
            d1: reading.d1,
            d2: reading.d2,
            z1: reading.z1,
            z2: reading.z2,
            mjd: mjd::epoch_value(reading.timestamp),
            daily_id,
            monthly_id,
        }
    }

    /// The reading this record was built from.
    #[must_use]
    pub fn reading(&self) -> SensorReading {
        SensorReading {
            timestamp: self.timestamp,
            x1: self.x1,
            x2: self.x2,
            y1: self.y1,
            y2: self.y2,
            d1: self.d1,
            d2: self.d2,
            z1: self.z1,
            z2: self.z2,
        }
    }
}

/// Serde adapter for the `YYYY-MM-DD HH:MM:SS` timestamp column.
///
/// Partition files carry naive timestamps in this form (the dashboard
/// parses them directly); values are interpreted as UTC.
pub mod csv_timestamp {
    use serde::{Deserialize, Deserializer, Serializer, de, ser};
    use time::format_description::BorrowedFormatItem;
    use time::macros::format_description;
    use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

    const FORMAT: &[BorrowedFormatItem<'_>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

    pub fn serialize<S: Serializer>(
        timestamp: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let utc = timestamp.to_offset(UtcOffset::UTC);
        let text = PrimitiveDateTime::new(utc.date(), utc.time())
            .format(&FORMAT)
            .map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        PrimitiveDateTime::parse(&text, &FORMAT)
            .map(PrimitiveDateTime::assume_utc)
            .map_err(de::Error::custom)
    }
}
