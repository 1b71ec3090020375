//! Arbitrary-precision decimal limiters.

use super::wrong_limits;
use crate::error::ConfigError;
use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};

/// Largest fractional precision, matching the widest numeric scale.
pub const MAX_DECIMAL_PRECISION: u32 = 16_383;

/// Largest integer digit count for `from_digits`.
pub const MAX_DECIMAL_DIGITS: u32 = 131_072;

/// Integer digits assumed when a numeric column gives no size.
pub const DEFAULT_DECIMAL_DIGITS: u32 = 38;

fn check_precision(precision: u32) -> Result<(), ConfigError> {
    if precision > MAX_DECIMAL_PRECISION {
        return Err(ConfigError::InvalidPrecision(precision));
    }
    Ok(())
}

/// Fractional digits carried by `v`; negative for trailing integer zeros.
pub(crate) fn scale_of(v: &BigDecimal) -> i64 {
    v.as_bigint_and_exponent().1
}

/// Canonical text: normalized, never in exponent notation.
pub(crate) fn decimal_text(v: &BigDecimal) -> String {
    v.normalized().to_plain_string()
}

pub(crate) fn round(precision: u32, v: BigDecimal) -> BigDecimal {
    if scale_of(&v) <= precision as i64 {
        return v;
    }
    v.with_scale_round(precision as i64, RoundingMode::HalfUp)
}

/// `|d| * 10^precision`, truncated to an integer.
pub(crate) fn scaled_units(d: &BigDecimal, precision: u32) -> BigInt {
    d.abs().with_scale(precision as i64).into_bigint_and_exponent().0
}

/// `10^-precision`, the smallest step at that precision.
fn unit(precision: u32) -> BigDecimal {
    BigDecimal::new(BigInt::from(1), precision as i64)
}

/// `±(10^digits - 1)`, the range of a numeric column with `digits` integer digits.
pub(crate) fn digits_bounds(digits: u32) -> Result<(BigInt, BigInt), ConfigError> {
    if digits == 0 || digits > MAX_DECIMAL_DIGITS {
        return Err(ConfigError::UnsupportedTypeSize(digits as usize));
    }
    let max: BigInt = BigInt::from(10).pow(digits) - 1;
    Ok((-max.clone(), max))
}

fn digits_decimal_bounds(digits: u32) -> Result<(BigDecimal, BigDecimal), ConfigError> {
    let (min, max) = digits_bounds(digits)?;
    Ok((BigDecimal::new(min, 0), BigDecimal::new(max, 0)))
}

/// Folds arbitrary decimals into `[min, max]` by modulo.
///
/// With a precision set, the fold width is `max - min + 10^-precision` so
/// that `max` itself is reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalLimiter {
    min: BigDecimal,
    max: BigDecimal,
    width: BigDecimal,
    precision: Option<u32>,
}

impl DecimalLimiter {
    pub fn new(min: BigDecimal, max: BigDecimal) -> Result<Self, ConfigError> {
        if min >= max {
            return Err(wrong_limits(&min, &max));
        }
        let width = &max - &min;
        Ok(Self {
            min,
            max,
            width,
            precision: None,
        })
    }

    /// Full range of a numeric column with `digits` digits before the point.
    pub fn from_digits(digits: u32) -> Result<Self, ConfigError> {
        let (min, max) = digits_decimal_bounds(digits)?;
        Self::new(min, max)
    }

    pub fn with_precision(mut self, precision: u32) -> Result<Self, ConfigError> {
        check_precision(precision)?;
        self.precision = Some(precision);
        self.width = &self.max - &self.min + unit(precision);
        Ok(self)
    }

    pub fn min(&self) -> &BigDecimal {
        &self.min
    }

    pub fn max(&self) -> &BigDecimal {
        &self.max
    }

    /// Size of the folding window.
    pub fn width(&self) -> &BigDecimal {
        &self.width
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn limit(&self, v: &BigDecimal) -> BigDecimal {
        let mut rem = v % &self.width;
        if rem.sign() == Sign::Minus {
            rem += &self.width;
        }
        let mut folded = &self.min + rem;
        if let Some(p) = self.precision {
            folded = round(p, folded);
        }
        folded.clamp(self.min.clone(), self.max.clone())
    }
}

/// Clamp window for decimal noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseDecimalLimiter {
    min: BigDecimal,
    max: BigDecimal,
    precision: Option<u32>,
}

impl NoiseDecimalLimiter {
    pub fn new(min: BigDecimal, max: BigDecimal) -> Result<Self, ConfigError> {
        if min >= max {
            return Err(wrong_limits(&min, &max));
        }
        Ok(Self {
            min,
            max,
            precision: None,
        })
    }

    pub fn from_digits(digits: u32) -> Result<Self, ConfigError> {
        let (min, max) = digits_decimal_bounds(digits)?;
        Self::new(min, max)
    }

    pub fn with_precision(mut self, precision: u32) -> Result<Self, ConfigError> {
        check_precision(precision)?;
        self.precision = Some(precision);
        Ok(self)
    }

    pub fn min(&self) -> &BigDecimal {
        &self.min
    }

    pub fn max(&self) -> &BigDecimal {
        &self.max
    }

    pub fn limit(&self, v: BigDecimal) -> BigDecimal {
        if v < self.min {
            return self.min.clone();
        }
        if v > self.max {
            return self.max.clone();
        }
        match self.precision {
            Some(p) => round(p, v).clamp(self.min.clone(), self.max.clone()),
            None => v,
        }
    }
}

/// Folds non-negative integers into the inclusive window `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigIntLimiter {
    min: BigInt,
    max: BigInt,
    width: BigInt,
}

impl BigIntLimiter {
    pub fn new(min: BigInt, max: BigInt) -> Result<Self, ConfigError> {
        if min >= max {
            return Err(wrong_limits(&min, &max));
        }
        let width = &max - &min + 1;
        Ok(Self { min, max, width })
    }

    pub fn from_digits(digits: u32) -> Result<Self, ConfigError> {
        let (min, max) = digits_bounds(digits)?;
        Self::new(min, max)
    }

    pub fn min(&self) -> &BigInt {
        &self.min
    }

    pub fn max(&self) -> &BigInt {
        &self.max
    }

    /// Bytes of generator output needed to reach every value in the window.
    pub fn byte_length(&self) -> usize {
        let bits = [&self.min, &self.max, &self.width]
            .into_iter()
            .map(|v| v.magnitude().bits())
            .max()
            .unwrap_or_default();
        (bits.div_ceil(8) as usize).max(1)
    }

    pub fn limit(&self, units: &BigInt) -> BigInt {
        let mut rem = units % &self.width;
        if rem.sign() == Sign::Minus {
            rem += &self.width;
        }
        &self.min + rem
    }
}
