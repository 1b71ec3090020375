use super::{GeneratorSlot, TruncatePart};
use crate::decode::{decode_i64, decode_u64};
use crate::error::{ConfigError, DecodeError, InsufficientSizeError, TransformError};
use crate::generator::Generator;
use crate::limiter::TimestampLimiter;
use chrono::{DateTime, Utc};

/// Random timestamps inside a window: 8 bytes of seconds, 8 of nanoseconds.
#[derive(Debug)]
pub struct RandomTimestampTransformer {
    slot: GeneratorSlot,
    limiter: TimestampLimiter,
    truncate: Option<TruncatePart>,
}

impl RandomTimestampTransformer {
    pub fn new(limiter: TimestampLimiter) -> Self {
        Self {
            slot: GeneratorSlot::new(16),
            limiter,
            truncate: None,
        }
    }

    /// Truncate results to `part`. Fails when the window holds no aligned instant.
    pub fn with_truncate(mut self, part: TruncatePart) -> Result<Self, ConfigError> {
        part.truncate_within(
            self.limiter.min(),
            Some(self.limiter.min()),
            Some(self.limiter.max()),
        )?;
        self.truncate = Some(part);
        Ok(self)
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    pub fn transform(
        &mut self,
        limiter: Option<&TimestampLimiter>,
        original: &[u8],
    ) -> Result<DateTime<Utc>, TransformError> {
        let bytes = self.slot.generate(original)?;
        let seconds = decode_i64(&bytes[..8]).unsigned_abs();
        let nanos = (decode_u64(&bytes[8..16]) % 1_000_000_000) as u32;

        let limiter = limiter.unwrap_or(&self.limiter);
        let value = limiter.limit_timestamp(seconds, nanos)?;
        Ok(match self.truncate {
            Some(part) => part
                .truncate_within(value, Some(limiter.min()), Some(limiter.max()))
                .map_err(DecodeError::RuntimeLimiter)?,
            None => value,
        })
    }
}
