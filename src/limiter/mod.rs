//! Range policies applied to candidate values.
//!
//! Noise limiters clamp a perturbed value into `[min, max]`. Random limiters
//! map decoded generator output into the window (uniform integer mapping,
//! ratio scaling, modulo folding for decimals and timestamps). Every limiter
//! is constructed only when `min < max`.

mod decimal;
mod numeric;
mod timestamp;

pub use decimal::{
    BigIntLimiter, DecimalLimiter, NoiseDecimalLimiter, DEFAULT_DECIMAL_DIGITS, MAX_DECIMAL_DIGITS,
    MAX_DECIMAL_PRECISION,
};
pub(crate) use decimal::{decimal_text, scale_of, scaled_units};
pub use numeric::{Float64Limiter, Int64Limiter, NoiseFloat64Limiter, NoiseInt64Limiter};
pub use timestamp::{NoiseTimestampLimiter, TimestampLimiter};

use crate::error::ConfigError;
use std::fmt::Display;

fn wrong_limits<T: Display>(min: T, max: T) -> ConfigError {
    ConfigError::WrongLimits {
        min: min.to_string(),
        max: max.to_string(),
    }
}

/// Round to `precision` fractional digits, halves away from zero.
pub fn round_half_away(precision: u32, v: f64) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let scaled = v * factor;
    if !scaled.is_finite() {
        return v;
    }
    scaled.round() / factor
}
