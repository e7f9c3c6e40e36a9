//! Partition keys derived from wall-clock time.
//!
//! The archive maintains two parallel partitions: one per calendar day and
//! one per calendar month. Both keys are derived from a single wall-clock
//! read so they can never disagree within one drain cycle.

use core::fmt;

use time::{Date, Month, OffsetDateTime};

/// Key of a daily partition: one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayKey(Date);

impl DayKey {
    /// Key for the given calendar date.
    #[must_use]
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    /// The calendar date this key covers.
    #[must_use]
    pub fn date(&self) -> Date {
        self.0
    }

    /// The monthly key this day falls into.
    #[must_use]
    pub fn month_key(&self) -> MonthKey {
        MonthKey {
            year: self.0.year(),
            month: self.0.month(),
        }
    }
}

impl fmt::Display for DayKey {
    /// Formats as `YYYY-MM-DD`, the form used in daily file names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

/// Key of a monthly partition: a calendar month of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: Month,
}

impl fmt::Display for MonthKey {
    /// Formats as `<MonthName>_<YYYY>`, the form used in monthly file names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.month, self.year)
    }
}

/// The pair of partition keys current at some instant.
///
/// Derived from one wall-clock read to avoid skew between the daily and
/// monthly partitions within a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionKeys {
    pub day: DayKey,
    pub month: MonthKey,
}

impl PartitionKeys {
    /// Both keys for the given instant.
    #[must_use]
    pub fn at(now: OffsetDateTime) -> Self {
        let day = DayKey::new(now.date());
        Self {
            day,
            month: day.month_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn keys_from_one_instant() {
        let keys = PartitionKeys::at(datetime!(2024-01-05 23:59:59 UTC));
        assert_eq!(keys.day.to_string(), "2024-01-05");
        assert_eq!(keys.month.to_string(), "January_2024");
        assert_eq!(keys.day.month_key(), keys.month);
    }

    #[test]
    fn day_advances_month_stays() {
        let before = PartitionKeys::at(datetime!(2024-01-05 23:59:59 UTC));
        let after = PartitionKeys::at(datetime!(2024-01-06 00:00:00 UTC));
        assert_ne!(before.day, after.day);
        assert_eq!(before.month, after.month);
    }

    #[test]
    fn month_advances_with_year_carry() {
        let dec = PartitionKeys::at(datetime!(2023-12-31 12:00:00 UTC));
        let jan = PartitionKeys::at(datetime!(2024-01-01 12:00:00 UTC));
        assert_eq!(dec.month.to_string(), "December_2023");
        assert_eq!(jan.month.to_string(), "January_2024");
        assert_ne!(dec.month, jan.month);
    }

    #[test]
    fn display_pads_single_digits() {
        let keys = PartitionKeys::at(datetime!(2024-03-07 00:00:00 UTC));
        assert_eq!(keys.day.to_string(), "2024-03-07");
        assert_eq!(keys.month.to_string(), "March_2024");
    }
}
