//! # Timestamps
//!
//! Session completion times, credential signing dates and expiries are all
//! a [`Timestamp`]: a UTC instant with whole-second precision.
//!
//! ## Invariant
//!
//! No sub-second component and no offset other than `Z`. A record written
//! to disk and read back must compare equal to the one in memory.
//!
//! On the wire a timestamp is written as `"2026-01-15T12:00:00Z"`. Reading
//! also accepts a bare integer of Unix seconds, which is how older log
//! files stored their times.

use std::fmt;

use chrono::{DateTime, Months, SubsecRound, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// A UTC instant, truncated to seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current time.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Wrap a chrono instant, dropping its fractional seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(0))
    }

    /// Parse an RFC 3339 string. Only the `Z` designator is accepted;
    /// `+00:00` is rejected along with every other offset.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::InvalidTimestamp(format!("{s:?} is not in UTC")));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self::from_utc(dt.with_timezone(&Utc)))
            .map_err(|e| CoreError::InvalidTimestamp(format!("{s:?}: {e}")))
    }

    /// The instant `secs` seconds after the Unix epoch.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CoreError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidTimestamp(format!("epoch seconds {secs} out of range")))
    }

    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// The instant `months` calendar months later, or `None` on overflow.
    ///
    /// Day-of-month is clamped, so January 31st plus one month is the last
    /// day of February.
    pub fn checked_add_months(&self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Self)
    }

    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl Visitor<'_> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an RFC 3339 UTC string or Unix seconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
        Timestamp::parse(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
        Timestamp::from_epoch_secs(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
        let secs = i64::try_from(v).map_err(E::custom)?;
        self.visit_i64(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn fractional_seconds_are_dropped() {
        assert_eq!(Timestamp::now().0.nanosecond(), 0);
        let precise = Utc
            .with_ymd_and_hms(2026, 4, 2, 7, 15, 9)
            .unwrap()
            .with_nanosecond(500_000_001)
            .unwrap();
        assert_eq!(Timestamp::from_utc(precise), ts("2026-04-02T07:15:09Z"));
        assert_eq!(ts("2026-04-02T07:15:09.75Z"), ts("2026-04-02T07:15:09Z"));
    }

    #[test]
    fn only_zulu_is_accepted() {
        for bad in ["2026-04-02T07:15:09+00:00", "2026-04-02T09:15:09+02:00", "yesterday", ""] {
            assert!(Timestamp::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn epoch_seconds() {
        let t = ts("2026-04-02T07:15:09Z");
        assert_eq!(Timestamp::from_epoch_secs(t.epoch_secs()).unwrap(), t);
        assert!(Timestamp::from_epoch_secs(i64::MAX).is_err());
    }

    #[test]
    fn month_arithmetic_clamps_day() {
        let end_of_january = ts("2026-01-31T08:00:00Z");
        assert_eq!(
            end_of_january.checked_add_months(1).unwrap().to_iso8601(),
            "2026-02-28T08:00:00Z"
        );
        assert_eq!(
            end_of_january.checked_add_months(6).unwrap().to_iso8601(),
            "2026-07-31T08:00:00Z"
        );
    }

    #[test]
    fn wire_form_is_zulu_string() {
        let t = ts("2026-04-02T07:15:09Z");
        assert_eq!(serde_json::to_string(&t).unwrap(), r#""2026-04-02T07:15:09Z""#);
        assert_eq!(serde_json::from_str::<Timestamp>(r#""2026-04-02T07:15:09Z""#).unwrap(), t);
    }

    #[test]
    fn legacy_unix_seconds_are_read() {
        let t = ts("2026-04-02T07:15:09Z");
        let parsed: Timestamp = serde_json::from_str(&t.epoch_secs().to_string()).unwrap();
        assert_eq!(parsed, t);
    }

    #[test]
    fn offset_strings_fail_to_deserialize() {
        assert!(serde_json::from_str::<Timestamp>(r#""2026-04-02T07:15:09+01:00""#).is_err());
        assert!(serde_json::from_str::<Timestamp>("1.5").is_err());
    }
}
