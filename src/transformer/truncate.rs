use crate::error::ConfigError;
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Calendar unit a timestamp is truncated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruncatePart {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TruncatePart {
    /// Zero every field below this unit.
    pub fn truncate(self, t: DateTime<Utc>) -> DateTime<Utc> {
        let date = t.date_naive();
        let time = t.time();
        let (h, m, s) = (time.hour(), time.minute(), time.second());
        let nanos = time.nanosecond();

        let truncated: Option<NaiveDateTime> = match self {
            TruncatePart::Year => {
                NaiveDate::from_ymd_opt(date.year(), 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
            }
            TruncatePart::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            TruncatePart::Day => date.and_hms_opt(0, 0, 0),
            TruncatePart::Hour => date.and_hms_opt(h, 0, 0),
            TruncatePart::Minute => date.and_hms_opt(h, m, 0),
            TruncatePart::Second => date.and_hms_opt(h, m, s),
            TruncatePart::Millisecond => {
                date.and_hms_nano_opt(h, m, s, nanos / 1_000_000 * 1_000_000)
            }
            TruncatePart::Microsecond => date.and_hms_nano_opt(h, m, s, nanos / 1_000 * 1_000),
            TruncatePart::Nanosecond => return t,
        };
        truncated.map(|n| n.and_utc()).unwrap_or(t)
    }

    /// First instant at or after `t` that truncation leaves unchanged.
    pub fn ceil(self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let floor = self.truncate(t);
        if floor == t {
            return Some(t);
        }
        match self {
            TruncatePart::Year => floor.checked_add_months(Months::new(12)),
            TruncatePart::Month => floor.checked_add_months(Months::new(1)),
            TruncatePart::Day => floor.checked_add_signed(TimeDelta::days(1)),
            TruncatePart::Hour => floor.checked_add_signed(TimeDelta::hours(1)),
            TruncatePart::Minute => floor.checked_add_signed(TimeDelta::minutes(1)),
            TruncatePart::Second => floor.checked_add_signed(TimeDelta::seconds(1)),
            TruncatePart::Millisecond => floor.checked_add_signed(TimeDelta::milliseconds(1)),
            TruncatePart::Microsecond => floor.checked_add_signed(TimeDelta::microseconds(1)),
            TruncatePart::Nanosecond => Some(t),
        }
    }

    /// Truncate `t` without leaving `[min, max]`.
    ///
    /// A result below `min` moves up to the first aligned instant at or after
    /// `min`. Fails when the window holds no aligned instant.
    pub fn truncate_within(
        self,
        t: DateTime<Utc>,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Result<DateTime<Utc>, ConfigError> {
        let empty = || ConfigError::EmptyTruncatedWindow {
            part: self.to_string(),
            min: min.map(|m| m.to_rfc3339()).unwrap_or_default(),
            max: max.map(|m| m.to_rfc3339()).unwrap_or_default(),
        };
        let mut out = self.truncate(t);
        if let Some(lo) = min {
            if out < lo {
                out = self.ceil(lo).ok_or_else(empty)?;
            }
        }
        match max {
            Some(hi) if out > hi => Err(empty()),
            _ => Ok(out),
        }
    }
}

impl std::str::FromStr for TruncatePart {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "year" => Ok(TruncatePart::Year),
            "month" => Ok(TruncatePart::Month),
            "day" => Ok(TruncatePart::Day),
            "hour" => Ok(TruncatePart::Hour),
            "minute" => Ok(TruncatePart::Minute),
            "second" => Ok(TruncatePart::Second),
            "millisecond" => Ok(TruncatePart::Millisecond),
            "microsecond" => Ok(TruncatePart::Microsecond),
            "nanosecond" => Ok(TruncatePart::Nanosecond),
            _ => Err(ConfigError::UnknownTruncatePart(s.to_string())),
        }
    }
}

impl std::fmt::Display for TruncatePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TruncatePart::Year => "year",
            TruncatePart::Month => "month",
            TruncatePart::Day => "day",
            TruncatePart::Hour => "hour",
            TruncatePart::Minute => "minute",
            TruncatePart::Second => "second",
            TruncatePart::Millisecond => "millisecond",
            TruncatePart::Microsecond => "microsecond",
            TruncatePart::Nanosecond => "nanosecond",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_truncate_parts() {
        let t = ts("2023-07-19T13:45:27.123456789Z");
        let cases = [
            (TruncatePart::Year, "2023-01-01T00:00:00Z"),
            (TruncatePart::Month, "2023-07-01T00:00:00Z"),
            (TruncatePart::Day, "2023-07-19T00:00:00Z"),
            (TruncatePart::Hour, "2023-07-19T13:00:00Z"),
            (TruncatePart::Minute, "2023-07-19T13:45:00Z"),
            (TruncatePart::Second, "2023-07-19T13:45:27Z"),
            (TruncatePart::Millisecond, "2023-07-19T13:45:27.123Z"),
            (TruncatePart::Microsecond, "2023-07-19T13:45:27.123456Z"),
            (TruncatePart::Nanosecond, "2023-07-19T13:45:27.123456789Z"),
        ];
        for (part, expected) in cases {
            assert_eq!(part.truncate(t), ts(expected), "truncate to {}", part);
        }
    }

    #[test]
    fn test_ceil_steps_to_next_boundary() {
        let t = ts("2023-07-19T13:45:27.5Z");
        assert_eq!(TruncatePart::Year.ceil(t), Some(ts("2024-01-01T00:00:00Z")));
        assert_eq!(TruncatePart::Month.ceil(t), Some(ts("2023-08-01T00:00:00Z")));
        assert_eq!(TruncatePart::Day.ceil(t), Some(ts("2023-07-20T00:00:00Z")));
        assert_eq!(TruncatePart::Second.ceil(t), Some(ts("2023-07-19T13:45:28Z")));
        let aligned = ts("2023-07-19T00:00:00Z");
        assert_eq!(TruncatePart::Day.ceil(aligned), Some(aligned));
    }

    #[test]
    fn test_truncate_within_unaligned_min() {
        let min = ts("2000-01-01T12:00:00Z");
        let max = ts("2000-01-03T00:00:00Z");
        let v = TruncatePart::Day
            .truncate_within(ts("2000-01-01T18:30:00Z"), Some(min), Some(max))
            .unwrap();
        assert_eq!(v, ts("2000-01-02T00:00:00Z"));
        let v = TruncatePart::Day
            .truncate_within(ts("2000-01-02T18:30:00Z"), Some(min), Some(max))
            .unwrap();
        assert_eq!(v, ts("2000-01-02T00:00:00Z"));
    }

    #[test]
    fn test_truncate_within_empty_window() {
        let min = ts("2000-01-01T01:00:00Z");
        let max = ts("2000-01-01T23:00:00Z");
        assert!(matches!(
            TruncatePart::Day.truncate_within(ts("2000-01-01T05:00:00Z"), Some(min), Some(max)),
            Err(ConfigError::EmptyTruncatedWindow { .. })
        ));
        assert_eq!(
            TruncatePart::Hour
                .truncate_within(ts("2000-01-01T05:10:00Z"), Some(min), Some(max))
                .unwrap(),
            ts("2000-01-01T05:00:00Z")
        );
    }

    #[test]
    fn test_truncate_part_from_str() {
        assert_eq!("Month".parse::<TruncatePart>().unwrap(), TruncatePart::Month);
        assert_eq!(
            "fortnight".parse::<TruncatePart>(),
            Err(ConfigError::UnknownTruncatePart("fortnight".to_string()))
        );
        assert_eq!(TruncatePart::Microsecond.to_string(), "microsecond");
    }
}
