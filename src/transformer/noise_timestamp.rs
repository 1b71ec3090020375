//! Duration noise for timestamps.

use super::{GeneratorSlot, TruncatePart};
use crate::decode::decode_i64;
use crate::error::{ConfigError, DecodeError, InsufficientSizeError, TransformError};
use crate::generator::Generator;
use crate::limiter::NoiseTimestampLimiter;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

pub const NOISE_TIMESTAMP_BYTE_LENGTH: usize = 17;

/// Shifts a timestamp by a duration in `[min_ratio, max_ratio)`.
///
/// Byte 0 picks the direction (even subtracts), bytes 1..9 the offset in
/// nanoseconds above `min_ratio`.
#[derive(Debug)]
pub struct NoiseTimestampTransformer {
    slot: GeneratorSlot,
    min_nanos: i64,
    distance: i64,
    limiter: Option<NoiseTimestampLimiter>,
    truncate: Option<TruncatePart>,
}

fn duration_nanos(d: TimeDelta) -> Result<i64, ConfigError> {
    d.num_nanoseconds()
        .ok_or_else(|| ConfigError::InvalidDuration(d.to_string()))
}

impl NoiseTimestampTransformer {
    pub fn new(min_ratio: TimeDelta, max_ratio: TimeDelta) -> Result<Self, ConfigError> {
        if min_ratio >= max_ratio {
            return Err(ConfigError::WrongLimits {
                min: min_ratio.to_string(),
                max: max_ratio.to_string(),
            });
        }
        let min_nanos = duration_nanos(min_ratio)?;
        let max_nanos = duration_nanos(max_ratio)?;
        let distance = max_nanos
            .checked_sub(min_nanos)
            .ok_or_else(|| ConfigError::InvalidDuration(max_ratio.to_string()))?;
        Ok(Self {
            slot: GeneratorSlot::new(NOISE_TIMESTAMP_BYTE_LENGTH),
            min_nanos,
            distance,
            limiter: None,
            truncate: None,
        })
    }

    pub fn with_limiter(mut self, limiter: NoiseTimestampLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn with_truncate(mut self, part: TruncatePart) -> Self {
        self.truncate = Some(part);
        self
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    pub fn transform(
        &mut self,
        limiter: Option<&NoiseTimestampLimiter>,
        original: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, TransformError> {
        let input = original.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        let bytes = self.slot.generate(input.as_bytes())?;

        let offset = (decode_i64(&bytes[1..9]) % self.distance).abs();
        let shift = TimeDelta::nanoseconds(self.min_nanos + offset);
        let shifted = if bytes[0] % 2 == 0 {
            original.checked_sub_signed(shift)
        } else {
            original.checked_add_signed(shift)
        }
        .ok_or(DecodeError::TimestampOutOfRange {
            seconds: original.timestamp(),
            nanos: original.timestamp_subsec_nanos(),
        })?;

        let limiter = limiter.or(self.limiter.as_ref());
        let limited = match limiter {
            Some(l) => l.limit(shifted),
            None => shifted,
        };
        Ok(match self.truncate {
            Some(part) => part
                .truncate_within(
                    limited,
                    limiter.and_then(|l| l.min()),
                    limiter.and_then(|l| l.max()),
                )
                .map_err(DecodeError::RuntimeLimiter)?,
            None => limited,
        })
    }
}
