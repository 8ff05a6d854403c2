//! Broker-clock timestamps.
//!
//! Trade exports carry naive timestamps in the broker server's clock. They are
//! kept that way internally; [`BrokerClock`] converts them to local display time
//! with an explicit, configurable offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Deserializer};

/// Layouts accepted for naive timestamps, tried in order.
const TIMESTAMP_LAYOUTS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
];

/// Display layout for local timestamps (`2024-01-15 12:30`).
pub const DISPLAY_LAYOUT: &str = "%Y-%m-%d %H:%M";

/// Parse a broker timestamp.
///
/// Accepts RFC 3339 (the wall-clock part is kept, the offset dropped), ISO-like
/// layouts with `T` or space separators, the MT5 `YYYY.MM.DD HH:MM[:SS]`
/// dialect, and bare dates (midnight).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for layout in TIMESTAMP_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Serde helper: optional timestamp that degrades to `None` when absent,
/// null, or unparseable.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Broker-to-local clock conversion.
///
/// The offset is a business rule of the deployment (the broker server runs at a
/// fixed offset from the operator's desk), not a general timezone conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerClock {
    offset: TimeDelta,
}

impl BrokerClock {
    /// Offset applied when none is configured.
    pub const DEFAULT_OFFSET_HOURS: i64 = 2;

    /// Create a clock with the given offset in whole hours.
    #[must_use]
    pub fn from_offset_hours(hours: i64) -> Self {
        Self {
            offset: TimeDelta::try_hours(hours).unwrap_or_default(),
        }
    }

    /// A clock that applies no offset.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            offset: TimeDelta::zero(),
        }
    }

    /// Configured offset.
    #[must_use]
    pub const fn offset(&self) -> TimeDelta {
        self.offset
    }

    /// Convert a broker-clock instant to local time.
    #[must_use]
    pub fn to_local(&self, broker_time: NaiveDateTime) -> NaiveDateTime {
        broker_time
            .checked_add_signed(self.offset)
            .unwrap_or(broker_time)
    }

    /// Format a broker-clock instant as local display time.
    #[must_use]
    pub fn display(&self, broker_time: NaiveDateTime) -> String {
        self.to_local(broker_time).format(DISPLAY_LAYOUT).to_string()
    }
}

impl Default for BrokerClock {
    fn default() -> Self {
        Self::from_offset_hours(Self::DEFAULT_OFFSET_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use test_case::test_case;

    #[test_case("2024-01-15T10:30:00" ; "iso with t")]
    #[test_case("2024-01-15T10:30:00.250" ; "iso with fraction")]
    #[test_case("2024-01-15 10:30:00" ; "iso with space")]
    #[test_case("2024-01-15 10:30" ; "iso without seconds")]
    #[test_case("2024.01.15 10:30:00" ; "mt5 dialect")]
    #[test_case("2024.01.15 10:30" ; "mt5 without seconds")]
    #[test_case("2024-01-15T10:30:00Z" ; "rfc3339 utc")]
    #[test_case("2024-01-15T10:30:00+03:00" ; "rfc3339 offset keeps wall clock")]
    fn parses_supported_layouts(raw: &str) {
        let Some(parsed) = parse_timestamp(raw) else {
            panic!("layout should parse: {raw}");
        };
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.minute(), 30);
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let parsed = parse_timestamp("2024-02-01").unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.minute(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45 99:99").is_none());
    }

    #[test]
    fn default_clock_adds_two_hours() {
        let clock = BrokerClock::default();
        let broker = parse_timestamp("2024-01-15 23:30").unwrap();
        assert_eq!(clock.display(broker), "2024-01-16 01:30");
    }

    #[test]
    fn identity_clock_keeps_time() {
        let clock = BrokerClock::identity();
        let broker = parse_timestamp("2024-01-15 23:30").unwrap();
        assert_eq!(clock.to_local(broker), broker);
    }

    #[test]
    fn negative_offset_is_supported() {
        let clock = BrokerClock::from_offset_hours(-5);
        let broker = parse_timestamp("2024-01-15 03:00").unwrap();
        assert_eq!(clock.display(broker), "2024-01-14 22:00");
    }
}
