//! Value transformers.
//!
//! Each transformer owns a generator (attached after construction with
//! `set_generator`) and draws exactly one block of bytes per call. Noise
//! transformers perturb the original value; random transformers only use
//! the original as generator input.
//!
//! The [`Transformer`] enum dispatches on [`Value`] for callers that do not
//! know the concrete kind, such as the config layer and the CLI.

mod choice;
mod ip;
mod mac;
mod noise;
mod noise_timestamp;
mod random_numeric;
mod random_timestamp;
mod string;
mod truncate;

pub use choice::{RandomBoolTransformer, RandomChoiceTransformer, RandomUuidTransformer};
pub use ip::{RandomIpTransformer, Subnet};
pub use mac::{CastType, MacAddress, MacInfo, ManagementType, RandomMacTransformer};
pub use noise::{
    NoiseDecimalTransformer, NoiseFloat64Transformer, NoiseInt64Transformer, NOISE_BYTE_LENGTH,
};
pub use noise_timestamp::{NoiseTimestampTransformer, NOISE_TIMESTAMP_BYTE_LENGTH};
pub use random_numeric::{
    RandomBigIntTransformer, RandomDecimalTransformer, RandomFloat64Transformer,
    RandomInt64Transformer,
};
pub use random_timestamp::RandomTimestampTransformer;
pub use string::RandomStringTransformer;
pub use truncate::TruncatePart;

use crate::error::{DecodeError, GenerationError, InsufficientSizeError, TransformError};
use crate::generator::{ensure_len, Generator};
use crate::limiter::decimal_text;
use bigdecimal::BigDecimal;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use uuid::Uuid;

/// A typed value flowing in and out of [`Transformer::transform`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    Timestamp(DateTime<Utc>),
    Text(String),
    Uuid(Uuid),
    Bool(bool),
    Ip(IpAddr),
    Mac(MacAddress),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Timestamp(_) => "timestamp",
            Value::Text(_) => "text",
            Value::Uuid(_) => "uuid",
            Value::Bool(_) => "bool",
            Value::Ip(_) => "ip",
            Value::Mac(_) => "mac",
        }
    }

    /// Generator input for this value: its canonical text.
    pub fn to_input(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    fn as_int(&self) -> Result<i64, DecodeError> {
        match self {
            Value::Int(v) => Ok(*v),
            Value::Text(s) => parse_text("integer", s),
            other => Err(unexpected("integer", other)),
        }
    }

    fn as_float(&self) -> Result<f64, DecodeError> {
        match self {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            Value::Text(s) => parse_text("float", s),
            other => Err(unexpected("float", other)),
        }
    }

    fn as_decimal(&self) -> Result<BigDecimal, DecodeError> {
        match self {
            Value::Decimal(v) => Ok(v.clone()),
            Value::Int(v) => Ok(BigDecimal::from(*v)),
            Value::Text(s) => parse_text("decimal", s),
            other => Err(unexpected("decimal", other)),
        }
    }

    fn as_timestamp(&self) -> Result<DateTime<Utc>, DecodeError> {
        match self {
            Value::Timestamp(v) => Ok(*v),
            Value::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| DecodeError::Parse {
                    kind: "timestamp",
                    input: s.clone(),
                }),
            other => Err(unexpected("timestamp", other)),
        }
    }

    fn as_mac(&self) -> Result<MacAddress, DecodeError> {
        match self {
            Value::Mac(v) => Ok(*v),
            Value::Text(s) => s.trim().parse(),
            other => Err(unexpected("mac", other)),
        }
    }
}

fn parse_text<T: FromStr>(kind: &'static str, s: &str) -> Result<T, DecodeError> {
    s.trim().parse().map_err(|_| DecodeError::Parse {
        kind,
        input: s.to_string(),
    })
}

fn unexpected(expected: &'static str, got: &Value) -> DecodeError {
    DecodeError::UnexpectedValue {
        expected,
        got: got.kind(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", decimal_text(v)),
            Value::Timestamp(v) => write!(f, "{}", v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Text(v) => write!(f, "{}", v),
            Value::Uuid(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Ip(v) => write!(f, "{}", v),
            Value::Mac(v) => write!(f, "{}", v),
        }
    }
}

/// Owned generator plus the byte count its transformer consumes per call.
pub(crate) struct GeneratorSlot {
    required: usize,
    generator: Option<Box<dyn Generator>>,
}

impl GeneratorSlot {
    pub(crate) fn new(required: usize) -> Self {
        Self {
            required,
            generator: None,
        }
    }

    pub(crate) fn required(&self) -> usize {
        self.required
    }

    pub(crate) fn attach(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        let available = generator.size();
        if available < self.required {
            return Err(InsufficientSizeError {
                required: self.required,
                available,
            });
        }
        tracing::debug!(required = self.required, available, "attached generator");
        self.generator = Some(generator);
        Ok(())
    }

    /// Generate and truncate to the required length.
    pub(crate) fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GenerationError> {
        let generator = self
            .generator
            .as_mut()
            .ok_or(GenerationError::MissingGenerator)?;
        let mut out = generator.generate(input)?;
        ensure_len(&out, self.required)?;
        out.truncate(self.required);
        Ok(out)
    }
}

impl fmt::Debug for GeneratorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorSlot")
            .field("required", &self.required)
            .field("attached", &self.generator.is_some())
            .finish()
    }
}

/// Any transformer, dispatching on [`Value`].
#[derive(Debug)]
pub enum Transformer {
    NoiseInt(NoiseInt64Transformer),
    NoiseFloat(NoiseFloat64Transformer),
    NoiseDecimal(NoiseDecimalTransformer),
    NoiseTimestamp(NoiseTimestampTransformer),
    RandomInt(RandomInt64Transformer),
    RandomFloat(RandomFloat64Transformer),
    RandomDecimal(RandomDecimalTransformer),
    RandomBigInt(RandomBigIntTransformer),
    RandomTimestamp(RandomTimestampTransformer),
    RandomString(RandomStringTransformer),
    RandomUuid(RandomUuidTransformer),
    RandomBool(RandomBoolTransformer),
    RandomChoice(RandomChoiceTransformer<Value>),
    RandomIp(RandomIpTransformer),
    RandomMac(RandomMacTransformer),
}

impl Transformer {
    pub fn kind(&self) -> &'static str {
        match self {
            Transformer::NoiseInt(_) => "noise_int",
            Transformer::NoiseFloat(_) => "noise_float",
            Transformer::NoiseDecimal(_) => "noise_decimal",
            Transformer::NoiseTimestamp(_) => "noise_timestamp",
            Transformer::RandomInt(_) => "random_int",
            Transformer::RandomFloat(_) => "random_float",
            Transformer::RandomDecimal(_) => "random_decimal",
            Transformer::RandomBigInt(_) => "random_bigint",
            Transformer::RandomTimestamp(_) => "random_timestamp",
            Transformer::RandomString(_) => "random_string",
            Transformer::RandomUuid(_) => "random_uuid",
            Transformer::RandomBool(_) => "random_bool",
            Transformer::RandomChoice(_) => "random_choice",
            Transformer::RandomIp(_) => "random_ip",
            Transformer::RandomMac(_) => "random_mac",
        }
    }

    pub fn required_byte_length(&self) -> usize {
        match self {
            Transformer::NoiseInt(t) => t.required_byte_length(),
            Transformer::NoiseFloat(t) => t.required_byte_length(),
            Transformer::NoiseDecimal(t) => t.required_byte_length(),
            Transformer::NoiseTimestamp(t) => t.required_byte_length(),
            Transformer::RandomInt(t) => t.required_byte_length(),
            Transformer::RandomFloat(t) => t.required_byte_length(),
            Transformer::RandomDecimal(t) => t.required_byte_length(),
            Transformer::RandomBigInt(t) => t.required_byte_length(),
            Transformer::RandomTimestamp(t) => t.required_byte_length(),
            Transformer::RandomString(t) => t.required_byte_length(),
            Transformer::RandomUuid(t) => t.required_byte_length(),
            Transformer::RandomBool(t) => t.required_byte_length(),
            Transformer::RandomChoice(t) => t.required_byte_length(),
            Transformer::RandomIp(t) => t.required_byte_length(),
            Transformer::RandomMac(t) => t.required_byte_length(),
        }
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        tracing::debug!(transformer = self.kind(), "wiring generator");
        match self {
            Transformer::NoiseInt(t) => t.set_generator(generator),
            Transformer::NoiseFloat(t) => t.set_generator(generator),
            Transformer::NoiseDecimal(t) => t.set_generator(generator),
            Transformer::NoiseTimestamp(t) => t.set_generator(generator),
            Transformer::RandomInt(t) => t.set_generator(generator),
            Transformer::RandomFloat(t) => t.set_generator(generator),
            Transformer::RandomDecimal(t) => t.set_generator(generator),
            Transformer::RandomBigInt(t) => t.set_generator(generator),
            Transformer::RandomTimestamp(t) => t.set_generator(generator),
            Transformer::RandomString(t) => t.set_generator(generator),
            Transformer::RandomUuid(t) => t.set_generator(generator),
            Transformer::RandomBool(t) => t.set_generator(generator),
            Transformer::RandomChoice(t) => t.set_generator(generator),
            Transformer::RandomIp(t) => t.set_generator(generator),
            Transformer::RandomMac(t) => t.set_generator(generator),
        }
    }

    /// Transform one value with the default limiters.
    ///
    /// Noise kinds require a value of their own kind (or text that parses as
    /// one); random kinds accept any value and hash its canonical text.
    pub fn transform(&mut self, original: &Value) -> Result<Value, TransformError> {
        tracing::trace!(transformer = self.kind(), value = %original, "transform");
        let out = match self {
            Transformer::NoiseInt(t) => Value::Int(t.transform(None, original.as_int()?)?),
            Transformer::NoiseFloat(t) => Value::Float(t.transform(None, original.as_float()?)?),
            Transformer::NoiseDecimal(t) => {
                Value::Decimal(t.transform(None, original.as_decimal()?)?)
            }
            Transformer::NoiseTimestamp(t) => {
                Value::Timestamp(t.transform(None, original.as_timestamp()?)?)
            }
            Transformer::RandomInt(t) => Value::Int(t.transform(None, &original.to_input())?),
            Transformer::RandomFloat(t) => Value::Float(t.transform(None, &original.to_input())?),
            Transformer::RandomDecimal(t) => {
                Value::Decimal(t.transform(None, &original.to_input())?)
            }
            Transformer::RandomBigInt(t) => {
                Value::Decimal(BigDecimal::new(t.transform(None, &original.to_input())?, 0))
            }
            Transformer::RandomTimestamp(t) => {
                Value::Timestamp(t.transform(None, &original.to_input())?)
            }
            Transformer::RandomString(t) => Value::Text(t.transform(&original.to_input())?),
            Transformer::RandomUuid(t) => Value::Uuid(t.transform(&original.to_input())?),
            Transformer::RandomBool(t) => Value::Bool(t.transform(&original.to_input())?),
            Transformer::RandomChoice(t) => t.transform(&original.to_input())?,
            Transformer::RandomIp(t) => Value::Ip(t.transform(None, &original.to_input())?),
            Transformer::RandomMac(t) => {
                if t.keeps_original_vendor() {
                    Value::Mac(t.transform(&original.as_mac()?)?)
                } else {
                    Value::Mac(t.transform_bytes(&original.to_input())?)
                }
            }
        };
        Ok(out)
    }
}
