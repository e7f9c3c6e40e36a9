//! Wall-clock abstraction.
//!
//! The drain driver reads the clock once per cycle to derive its
//! partition keys. Injecting the clock lets tests drive many cycles and
//! day/month rollovers without real wall-clock delays.

use std::sync::{Arc, Mutex};

use time::{Duration, OffsetDateTime};

/// A source of the current wall-clock time.
pub trait Clock {
    /// The current instant (UTC).
    fn now(&self) -> OffsetDateTime;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A hand-driven clock for tests.
///
/// Clones share the same underlying instant, so a test can keep one
/// clone and advance time while the drainer owns another.
///
/// # Example
///
/// ```
/// use octolog_service::{Clock, ManualClock};
/// use time::Duration;
/// use time::macros::datetime;
///
/// let clock = ManualClock::new(datetime!(2024-01-05 23:59:59 UTC));
/// let shared = clock.clone();
/// shared.advance(Duration::seconds(1));
/// assert_eq!(clock.now(), datetime!(2024-01-06 00:00:00 UTC));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<OffsetDateTime>>,
}

impl ManualClock {
    /// A clock frozen at the given instant.
    #[must_use]
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Jump to a specific instant.
    pub fn set(&self, now: OffsetDateTime) {
        *self.now.lock().unwrap() = now;
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}
