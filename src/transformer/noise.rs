//! Multiplicative noise for integers, floats and decimals.
//!
//! Every call draws 9 bytes for the text of the original value. The first 8
//! pick a multiplier in `[min_ratio, max_ratio]`, byte 8 picks its sign
//! (even means negative), and the result is `original + original * multiplier`
//! passed through the effective limiter.

use super::GeneratorSlot;
use crate::decode::unit_ratio;
use crate::error::{ConfigError, DecodeError, InsufficientSizeError, TransformError};
use crate::generator::Generator;
use crate::limiter::{decimal_text, NoiseDecimalLimiter, NoiseFloat64Limiter, NoiseInt64Limiter};
use bigdecimal::BigDecimal;
use std::str::FromStr;

pub const NOISE_BYTE_LENGTH: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct NoiseRatio {
    min: f64,
    max: f64,
}

impl NoiseRatio {
    fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ConfigError::WrongLimits {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { min, max })
    }

    fn multiplier(&self, bytes: &[u8]) -> f64 {
        let r = unit_ratio(&bytes[..8]);
        let m = self.min + r * (self.max - self.min);
        let negative = bytes[8] % 2 == 0;
        if (m < 0.0) != negative {
            -m
        } else {
            m
        }
    }
}

/// Noise for 64-bit integers.
#[derive(Debug)]
pub struct NoiseInt64Transformer {
    slot: GeneratorSlot,
    ratio: NoiseRatio,
    limiter: Option<NoiseInt64Limiter>,
}

impl NoiseInt64Transformer {
    pub fn new(min_ratio: f64, max_ratio: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            slot: GeneratorSlot::new(NOISE_BYTE_LENGTH),
            ratio: NoiseRatio::new(min_ratio, max_ratio)?,
            limiter: None,
        })
    }

    pub fn with_limiter(mut self, limiter: NoiseInt64Limiter) -> Self {
        self.limiter = Some(limiter);
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
        limiter: Option<&NoiseInt64Limiter>,
        original: i64,
    ) -> Result<i64, TransformError> {
        let bytes = self.slot.generate(original.to_string().as_bytes())?;
        let multiplier = self.ratio.multiplier(&bytes);
        // f64 to i64 casts saturate
        let delta = (original as f64 * multiplier) as i64;
        let noised = original.saturating_add(delta);
        Ok(match limiter.or(self.limiter.as_ref()) {
            Some(l) => l.limit(noised),
            None => noised,
        })
    }
}

/// Noise for 64-bit floats.
#[derive(Debug)]
pub struct NoiseFloat64Transformer {
    slot: GeneratorSlot,
    ratio: NoiseRatio,
    limiter: Option<NoiseFloat64Limiter>,
}

impl NoiseFloat64Transformer {
    pub fn new(min_ratio: f64, max_ratio: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            slot: GeneratorSlot::new(NOISE_BYTE_LENGTH),
            ratio: NoiseRatio::new(min_ratio, max_ratio)?,
            limiter: None,
        })
    }

    pub fn with_limiter(mut self, limiter: NoiseFloat64Limiter) -> Self {
        self.limiter = Some(limiter);
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
        limiter: Option<&NoiseFloat64Limiter>,
        original: f64,
    ) -> Result<f64, TransformError> {
        let bytes = self.slot.generate(format!("{:.6}", original).as_bytes())?;
        let noised = original + original * self.ratio.multiplier(&bytes);
        Ok(match limiter.or(self.limiter.as_ref()) {
            Some(l) => l.limit(noised),
            None => noised,
        })
    }
}

/// Noise for arbitrary-precision decimals.
///
/// The multiplier enters the arithmetic in its shortest decimal form.
#[derive(Debug)]
pub struct NoiseDecimalTransformer {
    slot: GeneratorSlot,
    ratio: NoiseRatio,
    limiter: Option<NoiseDecimalLimiter>,
}

impl NoiseDecimalTransformer {
    pub fn new(min_ratio: f64, max_ratio: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            slot: GeneratorSlot::new(NOISE_BYTE_LENGTH),
            ratio: NoiseRatio::new(min_ratio, max_ratio)?,
            limiter: None,
        })
    }

    pub fn with_limiter(mut self, limiter: NoiseDecimalLimiter) -> Self {
        self.limiter = Some(limiter);
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
        limiter: Option<&NoiseDecimalLimiter>,
        original: BigDecimal,
    ) -> Result<BigDecimal, TransformError> {
        let bytes = self.slot.generate(decimal_text(&original).as_bytes())?;
        let text = self.ratio.multiplier(&bytes).to_string();
        let multiplier = BigDecimal::from_str(&text).map_err(|_| DecodeError::Parse {
            kind: "decimal",
            input: text.clone(),
        })?;
        let noised = &original + &original * multiplier;

        Ok(match limiter.or(self.limiter.as_ref()) {
            Some(l) => l.limit(noised),
            None => noised,
        })
    }
}
