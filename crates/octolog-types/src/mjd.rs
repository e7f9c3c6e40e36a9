//! Modified Julian Date conversion.
//!
//! The archive carries an alternate time axis alongside each timestamp: the
//! fractional number of days elapsed since the MJD reference instant,
//! 1858-11-17T00:00:00 UTC. The dashboard offers it as a plot axis and it
//! survives in the partition files as the `mjd` column.

use time::OffsetDateTime;
use time::macros::datetime;

/// The MJD reference instant: 1858-11-17T00:00:00 UTC.
pub const MJD_EPOCH: OffsetDateTime = datetime!(1858-11-17 00:00:00 UTC);

/// Fractional days elapsed since [`MJD_EPOCH`].
///
/// The fractional part is seconds-of-day / 86400, carrying whatever
/// sub-second precision the timestamp has. Pure and strictly monotonic:
/// for `t1 < t2`, `epoch_value(t1) < epoch_value(t2)`.
///
/// # Example
///
/// ```
/// use octolog_types::mjd;
/// use time::macros::datetime;
///
/// assert_eq!(mjd::epoch_value(mjd::MJD_EPOCH), 0.0);
/// assert_eq!(mjd::epoch_value(datetime!(2024-01-05 00:00:00 UTC)), 60314.0);
/// ```
#[must_use]
pub fn epoch_value(timestamp: OffsetDateTime) -> f64 {
    let elapsed = timestamp - MJD_EPOCH;
    elapsed.as_seconds_f64() / 86_400.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_zero() {
        assert_eq!(epoch_value(MJD_EPOCH), 0.0);
    }

    #[test]
    fn known_dates() {
        // Published MJD values: 2000-01-01 is 51544, 2024-01-01 is 60310.
        assert_eq!(epoch_value(datetime!(2000-01-01 00:00:00 UTC)), 51544.0);
        assert_eq!(epoch_value(datetime!(2024-01-01 00:00:00 UTC)), 60310.0);
        assert_eq!(epoch_value(datetime!(2024-01-05 00:00:00 UTC)), 60314.0);
    }

    #[test]
    fn fractional_day() {
        assert_eq!(epoch_value(datetime!(1858-11-17 12:00:00 UTC)), 0.5);

        let one_second = epoch_value(datetime!(2024-01-05 00:00:01 UTC));
        let expected = 60314.0 + 1.0 / 86_400.0;
        assert!((one_second - expected).abs() < 1e-9);
    }

    #[test]
    fn strictly_monotonic() {
        let times = [
            datetime!(2024-01-05 00:00:01 UTC),
            datetime!(2024-01-05 00:00:02 UTC),
            datetime!(2024-01-05 23:59:59 UTC),
            datetime!(2024-01-06 00:00:00 UTC),
            datetime!(2024-02-01 08:30:00 UTC),
        ];
        for pair in times.windows(2) {
            assert!(epoch_value(pair[0]) < epoch_value(pair[1]));
        }
    }
}
