//! ## slog-core::field::time
//! **Wall-clock timestamps carried by timestamp fields**

use std::time::SystemTime;

use chrono::{DateTime, TimeZone, Utc};

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Seconds and nanoseconds since the Unix epoch.
///
/// `nanos` is always normalized into `0..1_000_000_000`, so instants before
/// the epoch have negative `secs` and a positive fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    secs: i64,
    nanos: u32,
}

impl Timestamp {
    pub fn new(secs: i64, nanos: u32) -> Self {
        Self {
            secs: secs.saturating_add(i64::from(nanos / NANOS_PER_SEC)),
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Utc::now().into()
    }

    #[inline]
    pub fn secs(&self) -> i64 {
        self.secs
    }

    #[inline]
    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    #[inline]
    pub fn millis(&self) -> u32 {
        self.nanos / 1_000_000
    }

    /// Converts into a zoned date-time, `None` when out of chrono's range.
    pub fn to_datetime<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_opt(self.secs, self.nanos).earliest()
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::new(dt.timestamp(), dt.timestamp_subsec_nanos())
    }
}

impl From<SystemTime> for Timestamp {
    fn from(t: SystemTime) -> Self {
        DateTime::<Utc>::from(t).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn normalizes_overflowing_nanos() {
        let ts = Timestamp::new(10, 2_500_000_000);
        assert_eq!(ts.secs(), 12);
        assert_eq!(ts.nanos(), 500_000_000);
        assert_eq!(ts.millis(), 500);
    }

    #[test]
    fn converts_system_time_before_epoch() {
        let t = UNIX_EPOCH - Duration::from_millis(1500);
        let ts = Timestamp::from(t);
        assert_eq!(ts.secs(), -2);
        assert_eq!(ts.nanos(), 500_000_000);
    }

    #[test]
    fn round_trips_through_chrono() {
        let ts = Timestamp::new(1_700_000_000, 123_456_789);
        let dt = ts.to_datetime(&Utc).unwrap();
        assert_eq!(Timestamp::from(dt), ts);
    }
}
