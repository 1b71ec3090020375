//! Integer and float limiters.

use super::{round_half_away, wrong_limits};
use crate::error::ConfigError;

/// Window for random integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int64Limiter {
    min: i64,
    max: i64,
}

impl Int64Limiter {
    pub fn new(min: i64, max: i64) -> Result<Self, ConfigError> {
        if min >= max {
            return Err(wrong_limits(min, max));
        }
        Ok(Self { min, max })
    }

    /// Full range of a column integer type of `size` bytes (int2, int4, int8).
    pub fn for_type_size(size: usize) -> Result<Self, ConfigError> {
        let (min, max) = int_type_bounds(size)?;
        Self::new(min, max)
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Map a uniformly distributed `v` onto `[min, max]`.
    pub fn limit(&self, v: u64) -> i64 {
        let distance = (self.max as i128 - self.min as i128 + 1) as u128;
        let offset = (v as u128 % distance) as i128;
        (self.min as i128 + offset) as i64
    }
}

/// Clamp window for integer noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseInt64Limiter {
    min: i64,
    max: i64,
}

impl NoiseInt64Limiter {
    pub fn new(min: i64, max: i64) -> Result<Self, ConfigError> {
        if min >= max {
            return Err(wrong_limits(min, max));
        }
        Ok(Self { min, max })
    }

    pub fn for_type_size(size: usize) -> Result<Self, ConfigError> {
        let (min, max) = int_type_bounds(size)?;
        Self::new(min, max)
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn limit(&self, v: i64) -> i64 {
        v.clamp(self.min, self.max)
    }
}

fn int_type_bounds(size: usize) -> Result<(i64, i64), ConfigError> {
    match size {
        2 => Ok((i16::MIN as i64, i16::MAX as i64)),
        4 => Ok((i32::MIN as i64, i32::MAX as i64)),
        8 => Ok((i64::MIN, i64::MAX)),
        _ => Err(ConfigError::UnsupportedTypeSize(size)),
    }
}

fn float_type_bounds(size: usize) -> Result<(f64, f64), ConfigError> {
    match size {
        4 => Ok((f32::MIN as f64, f32::MAX as f64)),
        8 => Ok((f64::MIN, f64::MAX)),
        _ => Err(ConfigError::UnsupportedTypeSize(size)),
    }
}

fn check_float_limits(min: f64, max: f64) -> Result<(), ConfigError> {
    // Also rejects NaN and infinite bounds
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(wrong_limits(min, max));
    }
    Ok(())
}

/// Window for random floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float64Limiter {
    min: f64,
    max: f64,
    precision: Option<u32>,
}

impl Float64Limiter {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        check_float_limits(min, max)?;
        Ok(Self {
            min,
            max,
            precision: None,
        })
    }

    /// Full range of a float column of `size` bytes (float4, float8).
    pub fn for_type_size(size: usize) -> Result<Self, ConfigError> {
        let (min, max) = float_type_bounds(size)?;
        Self::new(min, max)
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Scale `ratio ∈ [0, 1]` onto `[min, max]`.
    pub fn limit(&self, ratio: f64) -> f64 {
        let ratio = ratio.clamp(0.0, 1.0);
        // Interpolate per bound so the full f64 range does not overflow
        let mut v = self.min * (1.0 - ratio) + self.max * ratio;
        if let Some(p) = self.precision {
            v = round_half_away(p, v);
        }
        v.clamp(self.min, self.max)
    }
}

/// Clamp window for float noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseFloat64Limiter {
    min: f64,
    max: f64,
    precision: Option<u32>,
}

impl NoiseFloat64Limiter {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        check_float_limits(min, max)?;
        Ok(Self {
            min,
            max,
            precision: None,
        })
    }

    pub fn for_type_size(size: usize) -> Result<Self, ConfigError> {
        let (min, max) = float_type_bounds(size)?;
        Self::new(min, max)
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn limit(&self, v: f64) -> f64 {
        if v.is_nan() {
            return self.min;
        }
        if v < self.min {
            return self.min;
        }
        if v > self.max {
            return self.max;
        }
        match self.precision {
            Some(p) => round_half_away(p, v).clamp(self.min, self.max),
            None => v,
        }
    }
}
