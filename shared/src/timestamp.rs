//! Frame timestamps with nanosecond resolution.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Timestamp structure aligned with V4L2 format.
/// Represents time as seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds component
    pub seconds: u64,
    /// Nanoseconds component (0-999,999,999)
    pub nanos: u64,
}

impl Timestamp {
    /// Create a new timestamp, carrying any nanosecond overflow into seconds
    pub fn new(seconds: u64, nanos: u64) -> Self {
        Self {
            seconds: seconds + nanos / NANOS_PER_SECOND,
            nanos: nanos % NANOS_PER_SECOND,
        }
    }

    /// Create a timestamp from a Duration since epoch
    pub fn from_duration(duration: Duration) -> Self {
        let total_nanos = duration.as_nanos();
        let seconds = (total_nanos / NANOS_PER_SECOND as u128) as u64;
        let nanos = (total_nanos % NANOS_PER_SECOND as u128) as u64;
        Self { seconds, nanos }
    }

    /// Convert to Duration
    pub fn to_duration(&self) -> Duration {
        Duration::new(self.seconds, self.nanos as u32)
    }

    /// Convert a UTC wall-clock instant. Instants before the epoch have no
    /// representation and yield `None`.
    pub fn from_datetime(datetime: &DateTime<Utc>) -> Option<Self> {
        let seconds = u64::try_from(datetime.timestamp()).ok()?;
        // Leap seconds are reported as nanos >= 1e9; `new` carries them.
        Some(Self::new(seconds, datetime.timestamp_subsec_nanos() as u64))
    }

    /// Convert to a UTC wall-clock instant
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.seconds).ok()?;
        DateTime::from_timestamp(seconds, self.nanos as u32)
    }

    /// Total nanoseconds since epoch
    pub fn as_nanos(&self) -> u128 {
        self.seconds as u128 * NANOS_PER_SECOND as u128 + self.nanos as u128
    }

    /// Shift forward by a non-negative number of seconds, rounded to the
    /// nearest nanosecond.
    ///
    /// Returns `None` for negative or non-finite offsets.
    pub fn offset_by_seconds(&self, seconds: f64) -> Option<Self> {
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }
        let offset_nanos = (seconds * NANOS_PER_SECOND as f64).round() as u128;
        let total = self.as_nanos().checked_add(offset_nanos)?;
        let whole_seconds = u64::try_from(total / NANOS_PER_SECOND as u128).ok()?;
        Some(Self {
            seconds: whole_seconds,
            nanos: (total % NANOS_PER_SECOND as u128) as u64,
        })
    }

    /// Signed difference `self - earlier` in seconds
    pub fn seconds_since(&self, earlier: &Timestamp) -> f64 {
        let whole = self.seconds as f64 - earlier.seconds as f64;
        let frac = (self.nanos as f64 - earlier.nanos as f64) / NANOS_PER_SECOND as f64;
        whole + frac
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_carries_nanos() {
        let ts = Timestamp::new(10, 1_500_000_000);
        assert_eq!(ts.seconds, 11);
        assert_eq!(ts.nanos, 500_000_000);
    }

    #[test]
    fn test_offset_rounds_to_nanosecond() {
        let t0 = Timestamp::new(1_700_000_000, 950_000_000);
        let shifted = t0.offset_by_seconds(0.5 * 0.1).unwrap();
        assert_eq!(shifted, Timestamp::new(1_700_000_001, 0));
    }

    #[test]
    fn test_offset_rejects_negative() {
        let t0 = Timestamp::new(5, 0);
        assert!(t0.offset_by_seconds(-0.1).is_none());
        assert!(t0.offset_by_seconds(f64::NAN).is_none());
    }

    #[test]
    fn test_datetime_roundtrip_keeps_nanos() {
        let dt = DateTime::parse_from_rfc3339("2024-05-01T03:04:05.123456789Z")
            .unwrap()
            .with_timezone(&Utc);
        let ts = Timestamp::from_datetime(&dt).unwrap();
        assert_eq!(ts.nanos, 123_456_789);
        assert_eq!(ts.to_datetime().unwrap(), dt);
    }

    #[test]
    fn test_seconds_since() {
        let a = Timestamp::new(100, 900_000_000);
        let b = Timestamp::new(102, 100_000_000);
        assert_relative_eq!(b.seconds_since(&a), 1.2, epsilon = 1e-12);
        assert_relative_eq!(a.seconds_since(&b), -1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(Timestamp::new(3, 42).to_string(), "3.000000042");
    }
}
