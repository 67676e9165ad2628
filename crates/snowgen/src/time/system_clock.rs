use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::time::TimeSource;

/// Default epoch: Friday, January 1, 2021 00:00:00 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_609_459_200_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Wall-clock time source offset from a fixed epoch.
///
/// Reads `SystemTime::now()` on every call. Unlike a monotonic timer, it
/// follows NTP steps and manual adjustments, which is exactly what lets a
/// generator notice that time went backwards instead of silently reusing an
/// old timestamp.
///
/// The epoch must be picked once for a fleet and never changed: moving it
/// shifts every new ID relative to the ones already issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch_millis: u64,
}

impl Default for SystemClock {
    /// A clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl SystemClock {
    /// Uses `epoch` (a [`Duration`] since 1970-01-01 UTC) as t = 0.
    ///
    /// Epochs past `u64::MAX` milliseconds saturate, so the clock reads 0.
    ///
    /// ```
    /// use snowgen::{SystemClock, TimeSource, TWITTER_EPOCH};
    ///
    /// let clock = SystemClock::with_epoch(TWITTER_EPOCH);
    /// assert!(clock.current_millis() > 0);
    /// ```
    pub const fn with_epoch(epoch: Duration) -> Self {
        let millis = epoch.as_millis();
        Self {
            epoch_millis: if millis > u64::MAX as u128 {
                u64::MAX
            } else {
                millis as u64
            },
        }
    }

    /// The configured epoch.
    pub const fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch_millis)
    }
}

impl TimeSource for SystemClock {
    /// Milliseconds since the epoch. A wall clock set before the epoch (or
    /// before 1970) reads as 0.
    fn current_millis(&self) -> u64 {
        let unix_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        unix_millis.saturating_sub(self.epoch_millis)
    }
}
