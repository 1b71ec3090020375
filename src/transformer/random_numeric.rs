//! Random integers, floats and decimals.

use super::GeneratorSlot;
use crate::decode::{decode_u64, unit_ratio};
use crate::error::{ConfigError, InsufficientSizeError, TransformError};
use crate::generator::Generator;
use crate::limiter::{scaled_units, BigIntLimiter, DecimalLimiter, Float64Limiter, Int64Limiter};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

#[derive(Debug)]
pub struct RandomInt64Transformer {
    slot: GeneratorSlot,
    limiter: Int64Limiter,
}

impl RandomInt64Transformer {
    pub fn new(limiter: Int64Limiter) -> Self {
        Self {
            slot: GeneratorSlot::new(8),
            limiter,
        }
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    pub fn transform(
        &mut self,
        limiter: Option<&Int64Limiter>,
        original: &[u8],
    ) -> Result<i64, TransformError> {
        let bytes = self.slot.generate(original)?;
        Ok(limiter.unwrap_or(&self.limiter).limit(decode_u64(&bytes)))
    }
}

#[derive(Debug)]
pub struct RandomFloat64Transformer {
    slot: GeneratorSlot,
    limiter: Float64Limiter,
}

impl RandomFloat64Transformer {
    pub fn new(limiter: Float64Limiter) -> Self {
        Self {
            slot: GeneratorSlot::new(8),
            limiter,
        }
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    pub fn transform(
        &mut self,
        limiter: Option<&Float64Limiter>,
        original: &[u8],
    ) -> Result<f64, TransformError> {
        let bytes = self.slot.generate(original)?;
        Ok(limiter.unwrap_or(&self.limiter).limit(unit_ratio(&bytes)))
    }
}

/// Random decimals with a fixed number of fractional digits.
///
/// The generated bytes are read as a big-endian integer counted in units of
/// `10^-precision` and folded into the limiter window. The byte count covers
/// the default window; a per-call limiter needing more is rejected.
#[derive(Debug)]
pub struct RandomDecimalTransformer {
    slot: GeneratorSlot,
    limiter: DecimalLimiter,
    precision: u32,
}

impl RandomDecimalTransformer {
    pub fn new(limiter: DecimalLimiter, precision: u32) -> Result<Self, ConfigError> {
        let limiter = limiter.with_precision(precision)?;
        Ok(Self {
            slot: GeneratorSlot::new(decimal_byte_length(&limiter, precision)),
            limiter,
            precision,
        })
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    pub fn transform(
        &mut self,
        limiter: Option<&DecimalLimiter>,
        original: &[u8],
    ) -> Result<BigDecimal, TransformError> {
        let limiter = match limiter {
            Some(l) => {
                check_override(decimal_byte_length(l, self.precision), self.slot.required())?;
                l
            }
            None => &self.limiter,
        };
        let bytes = self.slot.generate(original)?;
        let units = BigInt::from_bytes_be(Sign::Plus, &bytes);
        Ok(limiter.limit(&BigDecimal::new(units, self.precision as i64)))
    }
}

/// Random integers of any width, for numeric columns with no fraction.
#[derive(Debug)]
pub struct RandomBigIntTransformer {
    slot: GeneratorSlot,
    limiter: BigIntLimiter,
}

impl RandomBigIntTransformer {
    pub fn new(limiter: BigIntLimiter) -> Self {
        Self {
            slot: GeneratorSlot::new(limiter.byte_length()),
            limiter,
        }
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    pub fn transform(
        &mut self,
        limiter: Option<&BigIntLimiter>,
        original: &[u8],
    ) -> Result<BigInt, TransformError> {
        let limiter = match limiter {
            Some(l) => {
                check_override(l.byte_length(), self.slot.required())?;
                l
            }
            None => &self.limiter,
        };
        let bytes = self.slot.generate(original)?;
        Ok(limiter.limit(&BigInt::from_bytes_be(Sign::Plus, &bytes)))
    }
}

fn check_override(required: usize, available: usize) -> Result<(), InsufficientSizeError> {
    if required > available {
        return Err(InsufficientSizeError {
            required,
            available,
        });
    }
    Ok(())
}

/// Bytes needed to cover the window in `10^-precision` units.
fn decimal_byte_length(limiter: &DecimalLimiter, precision: u32) -> usize {
    let bits = [limiter.min(), limiter.max(), limiter.width()]
        .into_iter()
        .map(|d| scaled_units(d, precision).magnitude().bits())
        .max()
        .unwrap_or_default();
    (bits.div_ceil(8) as usize).max(1)
}
