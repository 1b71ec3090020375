//! Timestamp limiters.

use super::wrong_limits;
use crate::error::{ConfigError, DecodeError};
use chrono::{DateTime, Utc};

const NANOS_PER_SEC: u32 = 1_000_000_000;

pub(crate) fn from_parts(seconds: i64, nanos: u32) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::from_timestamp(seconds, nanos)
        .ok_or(DecodeError::TimestampOutOfRange { seconds, nanos })
}

/// Folds `(seconds, nanos)` pairs into `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampLimiter {
    min: DateTime<Utc>,
    max: DateTime<Utc>,
    min_sec: i64,
    min_nano: u32,
    max_sec: i64,
    max_nano: u32,
    width: u64,
}

impl TimestampLimiter {
    pub fn new(min: DateTime<Utc>, max: DateTime<Utc>) -> Result<Self, ConfigError> {
        if min >= max {
            return Err(wrong_limits(min.to_rfc3339(), max.to_rfc3339()));
        }
        let min_sec = min.timestamp();
        let max_sec = max.timestamp();
        Ok(Self {
            min,
            max,
            min_sec,
            min_nano: min.timestamp_subsec_nanos().min(NANOS_PER_SEC - 1),
            max_sec,
            max_nano: max.timestamp_subsec_nanos().min(NANOS_PER_SEC - 1),
            width: (max_sec - min_sec) as u64 + 1,
        })
    }

    pub fn min(&self) -> DateTime<Utc> {
        self.min
    }

    pub fn max(&self) -> DateTime<Utc> {
        self.max
    }

    /// Fold into the window. Nanoseconds are re-bounded only on the edge seconds.
    pub fn limit(&self, seconds: u64, nanos: u32) -> (i64, u32) {
        let sec = self.min_sec + (seconds % self.width) as i64;
        let nano = nanos % NANOS_PER_SEC;
        let nano = match (sec == self.min_sec, sec == self.max_sec) {
            (true, true) => self.min_nano + nano % (self.max_nano - self.min_nano + 1),
            (true, false) => self.min_nano + nano % (NANOS_PER_SEC - self.min_nano),
            (false, true) => nano % (self.max_nano + 1),
            (false, false) => nano,
        };
        (sec, nano)
    }

    pub fn limit_timestamp(&self, seconds: u64, nanos: u32) -> Result<DateTime<Utc>, DecodeError> {
        let (sec, nano) = self.limit(seconds, nanos);
        from_parts(sec, nano)
    }
}

/// Clamp window for timestamp noise; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoiseTimestampLimiter {
    min: Option<DateTime<Utc>>,
    max: Option<DateTime<Utc>>,
}

impl NoiseTimestampLimiter {
    pub fn new(
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Result<Self, ConfigError> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo >= hi {
                return Err(wrong_limits(lo.to_rfc3339(), hi.to_rfc3339()));
            }
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Option<DateTime<Utc>> {
        self.min
    }

    pub fn max(&self) -> Option<DateTime<Utc>> {
        self.max
    }

    pub fn limit(&self, v: DateTime<Utc>) -> DateTime<Utc> {
        match (self.min, self.max) {
            (Some(lo), _) if v < lo => lo,
            (_, Some(hi)) if v > hi => hi,
            _ => v,
        }
    }
}
