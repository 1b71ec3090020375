//! YAML configuration for a single transformer.
//!
//! ```yaml
//! engine: deterministic
//! salt: "73656372657421"
//! transformer: random_int
//! min: 1
//! max: 100
//! ```
//!
//! Decimal and big-integer bounds wider than 64 bits must be quoted so the
//! YAML parser keeps every digit.

use crate::error::{ConfigError, Error};
use crate::generator::Engine;
use crate::limiter::{
    BigIntLimiter, DecimalLimiter, Float64Limiter, Int64Limiter, NoiseDecimalLimiter,
    NoiseFloat64Limiter, NoiseInt64Limiter, NoiseTimestampLimiter, TimestampLimiter,
    DEFAULT_DECIMAL_DIGITS,
};
use crate::transformer::{
    CastType, ManagementType, NoiseDecimalTransformer, NoiseFloat64Transformer,
    NoiseInt64Transformer, NoiseTimestampTransformer, RandomBigIntTransformer,
    RandomBoolTransformer, RandomChoiceTransformer, RandomDecimalTransformer,
    RandomFloat64Transformer,
    RandomInt64Transformer, RandomIpTransformer, RandomMacTransformer, RandomStringTransformer,
    RandomTimestampTransformer, RandomUuidTransformer, Transformer, TruncatePart, Value,
};
use anyhow::Context;
use bigdecimal::BigDecimal;
use chrono::{DateTime, TimeDelta, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default alphabet for `random_string`.
pub const DEFAULT_SYMBOLS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Engine and salt used to build generators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskSettings {
    pub engine: Engine,
    pub salt: Vec<u8>,
}

/// Transformer kind with its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transformer", rename_all = "snake_case")]
pub enum TransformerConfig {
    NoiseInt {
        min_ratio: f64,
        max_ratio: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
        /// Column width in bytes (2, 4, 8) supplying missing bounds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_size: Option<usize>,
    },

    NoiseFloat {
        min_ratio: f64,
        max_ratio: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        precision: Option<u32>,
        /// Column width in bytes (4, 8)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_size: Option<usize>,
    },

    NoiseDecimal {
        min_ratio: f64,
        max_ratio: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<BigDecimal>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<BigDecimal>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        precision: Option<u32>,
        /// Digits before the decimal point
        #[serde(default, skip_serializing_if = "Option::is_none")]
        digits: Option<u32>,
    },

    NoiseTimestamp {
        /// Duration text such as `1h` or `2d12h`
        min_ratio: String,
        max_ratio: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        truncate: Option<TruncatePart>,
    },

    RandomInt {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_size: Option<usize>,
    },

    RandomFloat {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        precision: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_size: Option<usize>,
    },

    RandomDecimal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<BigDecimal>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<BigDecimal>,
        #[serde(default)]
        precision: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        digits: Option<u32>,
    },

    /// Integers for numeric columns of any width; bounds must be whole numbers
    RandomBigint {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<BigDecimal>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<BigDecimal>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        digits: Option<u32>,
    },

    RandomTimestamp {
        min: DateTime<Utc>,
        max: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        truncate: Option<TruncatePart>,
    },

    RandomString {
        #[serde(default = "default_symbols")]
        symbols: String,
        min_length: usize,
        max_length: usize,
    },

    RandomUuid,

    RandomBool,

    RandomChoice {
        choices: Vec<String>,
    },

    RandomIp {
        /// Network in `addr/prefix` form
        subnet: String,
    },

    RandomMac {
        #[serde(default)]
        cast_type: CastType,
        #[serde(default)]
        management_type: ManagementType,
        #[serde(default)]
        keep_original_vendor: bool,
    },
}

fn default_symbols() -> String {
    DEFAULT_SYMBOLS.to_string()
}

/// Fill missing bounds from the type-size defaults.
fn resolve_bounds<T: Clone>(
    kind: &'static str,
    min: &Option<T>,
    max: &Option<T>,
    defaulted: bool,
    fallback: impl FnOnce() -> Result<(T, T), ConfigError>,
) -> Result<(T, T), ConfigError> {
    if let (Some(lo), Some(hi)) = (min, max) {
        return Ok((lo.clone(), hi.clone()));
    }
    if defaulted {
        tracing::warn!(
            transformer = kind,
            "limits not fully configured, using type-size defaults"
        );
    }
    let (lo, hi) = fallback()?;
    Ok((min.clone().unwrap_or(lo), max.clone().unwrap_or(hi)))
}

/// Default integer digits for a numeric column with `precision` fractional digits.
fn default_digits(precision: u32) -> u32 {
    DEFAULT_DECIMAL_DIGITS - precision.min(DEFAULT_DECIMAL_DIGITS - 1)
}

fn whole_number(v: BigDecimal) -> Result<BigInt, ConfigError> {
    if !v.is_integer() {
        return Err(ConfigError::NotAnInteger(v.to_string()));
    }
    Ok(v.with_scale(0).into_bigint_and_exponent().0)
}

fn wants_limiter<T, U>(min: &Option<T>, max: &Option<T>, type_size: &Option<U>) -> bool {
    min.is_some() || max.is_some() || type_size.is_some()
}

impl TransformerConfig {
    /// Build the transformer without a generator.
    pub fn transformer(&self) -> Result<Transformer, ConfigError> {
        let transformer = match self {
            TransformerConfig::NoiseInt {
                min_ratio,
                max_ratio,
                min,
                max,
                type_size,
            } => {
                let mut t = NoiseInt64Transformer::new(*min_ratio, *max_ratio)?;
                if wants_limiter(min, max, type_size) {
                    let (lo, hi) =
                        resolve_bounds("noise_int", min, max, type_size.is_none(), || {
                            NoiseInt64Limiter::for_type_size(type_size.unwrap_or(8))
                                .map(|l| (l.min(), l.max()))
                        })?;
                    t = t.with_limiter(NoiseInt64Limiter::new(lo, hi)?);
                }
                Transformer::NoiseInt(t)
            }

            TransformerConfig::NoiseFloat {
                min_ratio,
                max_ratio,
                min,
                max,
                precision,
                type_size,
            } => {
                let mut t = NoiseFloat64Transformer::new(*min_ratio, *max_ratio)?;
                if wants_limiter(min, max, type_size) || precision.is_some() {
                    let (lo, hi) =
                        resolve_bounds("noise_float", min, max, type_size.is_none(), || {
                            NoiseFloat64Limiter::for_type_size(type_size.unwrap_or(8))
                                .map(|l| (l.min(), l.max()))
                        })?;
                    let mut limiter = NoiseFloat64Limiter::new(lo, hi)?;
                    if let Some(p) = precision {
                        limiter = limiter.with_precision(*p);
                    }
                    t = t.with_limiter(limiter);
                }
                Transformer::NoiseFloat(t)
            }

            TransformerConfig::NoiseDecimal {
                min_ratio,
                max_ratio,
                min,
                max,
                precision,
                digits,
            } => {
                let mut t = NoiseDecimalTransformer::new(*min_ratio, *max_ratio)?;
                if wants_limiter(min, max, digits) || precision.is_some() {
                    let fallback = default_digits(precision.unwrap_or(0));
                    let (lo, hi) =
                        resolve_bounds("noise_decimal", min, max, digits.is_none(), || {
                            NoiseDecimalLimiter::from_digits(digits.unwrap_or(fallback))
                                .map(|l| (l.min().clone(), l.max().clone()))
                        })?;
                    let mut limiter = NoiseDecimalLimiter::new(lo, hi)?;
                    if let Some(p) = precision {
                        limiter = limiter.with_precision(*p)?;
                    }
                    t = t.with_limiter(limiter);
                }
                Transformer::NoiseDecimal(t)
            }

            TransformerConfig::NoiseTimestamp {
                min_ratio,
                max_ratio,
                min,
                max,
                truncate,
            } => {
                let mut t = NoiseTimestampTransformer::new(
                    parse_duration(min_ratio)?,
                    parse_duration(max_ratio)?,
                )?;
                if min.is_some() || max.is_some() {
                    t = t.with_limiter(NoiseTimestampLimiter::new(*min, *max)?);
                }
                if let Some(part) = truncate {
                    t = t.with_truncate(*part);
                }
                Transformer::NoiseTimestamp(t)
            }

            TransformerConfig::RandomInt {
                min,
                max,
                type_size,
            } => {
                let (lo, hi) = resolve_bounds("random_int", min, max, type_size.is_none(), || {
                    Int64Limiter::for_type_size(type_size.unwrap_or(8)).map(|l| (l.min(), l.max()))
                })?;
                Transformer::RandomInt(RandomInt64Transformer::new(Int64Limiter::new(lo, hi)?))
            }

            TransformerConfig::RandomFloat {
                min,
                max,
                precision,
                type_size,
            } => {
                let (lo, hi) =
                    resolve_bounds("random_float", min, max, type_size.is_none(), || {
                        Float64Limiter::for_type_size(type_size.unwrap_or(8))
                            .map(|l| (l.min(), l.max()))
                    })?;
                let mut limiter = Float64Limiter::new(lo, hi)?;
                if let Some(p) = precision {
                    limiter = limiter.with_precision(*p);
                }
                Transformer::RandomFloat(RandomFloat64Transformer::new(limiter))
            }

            TransformerConfig::RandomDecimal {
                min,
                max,
                precision,
                digits,
            } => {
                let fallback = default_digits(*precision);
                let (lo, hi) =
                    resolve_bounds("random_decimal", min, max, digits.is_none(), || {
                        DecimalLimiter::from_digits(digits.unwrap_or(fallback))
                            .map(|l| (l.min().clone(), l.max().clone()))
                    })?;
                Transformer::RandomDecimal(RandomDecimalTransformer::new(
                    DecimalLimiter::new(lo, hi)?,
                    *precision,
                )?)
            }

            TransformerConfig::RandomBigint { min, max, digits } => {
                let min = min.clone().map(whole_number).transpose()?;
                let max = max.clone().map(whole_number).transpose()?;
                let (lo, hi) =
                    resolve_bounds("random_bigint", &min, &max, digits.is_none(), || {
                        BigIntLimiter::from_digits(digits.unwrap_or(DEFAULT_DECIMAL_DIGITS))
                            .map(|l| (l.min().clone(), l.max().clone()))
                    })?;
                Transformer::RandomBigInt(RandomBigIntTransformer::new(BigIntLimiter::new(lo, hi)?))
            }

            TransformerConfig::RandomTimestamp { min, max, truncate } => {
                let mut t = RandomTimestampTransformer::new(TimestampLimiter::new(*min, *max)?);
                if let Some(part) = truncate {
                    t = t.with_truncate(*part)?;
                }
                Transformer::RandomTimestamp(t)
            }

            TransformerConfig::RandomString {
                symbols,
                min_length,
                max_length,
            } => Transformer::RandomString(RandomStringTransformer::new(
                symbols,
                *min_length,
                *max_length,
            )?),

            TransformerConfig::RandomUuid => Transformer::RandomUuid(RandomUuidTransformer::new()),

            TransformerConfig::RandomBool => Transformer::RandomBool(RandomBoolTransformer::new()),

            TransformerConfig::RandomChoice { choices } => {
                let values = choices.iter().cloned().map(Value::Text).collect();
                Transformer::RandomChoice(RandomChoiceTransformer::new(values)?)
            }

            TransformerConfig::RandomIp { subnet } => {
                Transformer::RandomIp(RandomIpTransformer::new(subnet.parse()?)?)
            }

            TransformerConfig::RandomMac {
                cast_type,
                management_type,
                keep_original_vendor,
            } => Transformer::RandomMac(RandomMacTransformer::new(
                *cast_type,
                *management_type,
                *keep_original_vendor,
            )),
        };
        Ok(transformer)
    }

    /// Build the transformer and attach a generator from `settings`.
    pub fn build(&self, settings: &MaskSettings) -> Result<Transformer, Error> {
        let mut transformer = self.transformer()?;
        let required = transformer.required_byte_length();
        let generator = settings.engine.generator(&settings.salt, required)?;
        transformer.set_generator(generator)?;
        tracing::debug!(
            transformer = transformer.kind(),
            engine = %settings.engine,
            required,
            "built transformer"
        );
        Ok(transformer)
    }

    /// Check the options without building a generator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.transformer().map(|_| ())
    }
}

/// Parse duration text: a sequence of `<n><unit>` terms, optionally negated.
///
/// Units: `ns`, `us`, `ms`, `s`, `m`, `h`, `d`.
pub fn parse_duration(text: &str) -> Result<TimeDelta, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(text.to_string());
    let trimmed = text.trim();
    let (negative, mut rest) = match trimmed.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, trimmed),
    };
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total = TimeDelta::zero();
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(invalid());
        }
        let n: i64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];
        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let term = match &rest[..unit_len] {
            "ns" => Some(TimeDelta::nanoseconds(n)),
            "us" => Some(TimeDelta::microseconds(n)),
            "ms" => TimeDelta::try_milliseconds(n),
            "s" => TimeDelta::try_seconds(n),
            "m" => TimeDelta::try_minutes(n),
            "h" => TimeDelta::try_hours(n),
            "d" => TimeDelta::try_days(n),
            _ => None,
        }
        .ok_or_else(invalid)?;
        total = total.checked_add(&term).ok_or_else(invalid)?;
        rest = &rest[unit_len..];
    }
    Ok(if negative { -total } else { total })
}

/// YAML configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskYamlConfig {
    /// `random` or `deterministic`
    #[serde(default)]
    pub engine: Engine,

    /// Hex-encoded salt for the deterministic engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,

    #[serde(flatten)]
    pub transformer: TransformerConfig,
}

impl MaskYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml_ng::from_str(content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_yaml_ng::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn settings(&self) -> Result<MaskSettings, ConfigError> {
        let salt = match &self.salt {
            Some(text) => {
                hex::decode(text.trim()).map_err(|e| ConfigError::InvalidSalt(e.to_string()))?
            }
            None => {
                if self.engine == Engine::Deterministic {
                    tracing::warn!("deterministic engine configured without a salt");
                }
                Vec::new()
            }
        };
        Ok(MaskSettings {
            engine: self.engine,
            salt,
        })
    }

    /// Validate salt and transformer options
    pub fn validate(&self) -> anyhow::Result<()> {
        self.settings()?;
        self.transformer.validate()?;
        Ok(())
    }

    /// Build a transformer with its generator attached
    pub fn build(&self) -> anyhow::Result<Transformer> {
        let settings = self.settings()?;
        Ok(self.transformer.build(&settings)?)
    }
}
