//! Error taxonomy for the masking engine.
//!
//! Configuration problems surface when a limiter, generator or transformer is
//! built; capacity problems when a generator is attached; generation and
//! decode problems only from `transform` calls.

use thiserror::Error;

/// Invalid construction parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("wrong limits: min ({min}) must be less than max ({max})")]
    WrongLimits { min: String, max: String },

    #[error("subnet {0} has no usable host addresses")]
    SubnetTooSmall(String),

    #[error("invalid subnet '{0}'")]
    InvalidSubnet(String),

    #[error("unable to find a hash function producing {0} bytes")]
    UnsupportedSize(usize),

    #[error("cannot increase generator size from {available} to {requested} bytes")]
    SizeIncrease { requested: usize, available: usize },

    #[error("generator chain must contain at least one stage")]
    EmptyChain,

    #[error("unknown truncate part '{0}'")]
    UnknownTruncatePart(String),

    #[error("min length ({min}) is greater than max length ({max})")]
    InvalidLength { min: usize, max: usize },

    #[error("character set cannot be empty")]
    EmptyAlphabet,

    #[error("choice list cannot be empty")]
    EmptyChoices,

    #[error("unsupported type size {0}")]
    UnsupportedTypeSize(usize),

    #[error("invalid precision {0}: at most 16383 fractional digits are supported")]
    InvalidPrecision(u32),

    #[error("invalid duration '{0}'")]
    InvalidDuration(String),

    #[error("invalid salt: {0}")]
    InvalidSalt(String),

    #[error("no {part}-aligned instant between {min} and {max}")]
    EmptyTruncatedWindow {
        part: String,
        min: String,
        max: String,
    },

    #[error("{0} is not an integer")]
    NotAnInteger(String),
}

/// The attached generator cannot produce enough bytes for the transformer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("requested byte length ({required}) higher than generator can produce ({available})")]
pub struct InsufficientSizeError {
    pub required: usize,
    pub available: usize,
}

/// The byte-stream primitive failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("no generator attached to the transformer")]
    MissingGenerator,

    #[error("generator returned {got} bytes, expected {expected}")]
    ShortOutput { expected: usize, got: usize },

    #[error("generator stage {index} failed: {source}")]
    Stage {
        index: usize,
        #[source]
        source: Box<GenerationError>,
    },
}

/// Malformed input for a domain-specific decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid MAC address '{0}'")]
    InvalidMac(String),

    #[error("timestamp out of range: seconds={seconds}, nanos={nanos}")]
    TimestampOutOfRange { seconds: i64, nanos: u32 },

    #[error("expected {expected} value, got {got}")]
    UnexpectedValue {
        expected: &'static str,
        got: &'static str,
    },

    #[error("cannot parse '{input}' as {kind}")]
    Parse { kind: &'static str, input: String },

    #[error("runtime subnet rejected: {0}")]
    RuntimeSubnet(ConfigError),

    #[error("runtime limiter rejected: {0}")]
    RuntimeLimiter(ConfigError),
}

/// Failure of a single `transform` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A per-call limiter needs more bytes than the generator slot provides.
    #[error(transparent)]
    Capacity(#[from] InsufficientSizeError),
}

/// Any error produced by the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InsufficientSize(#[from] InsufficientSizeError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl From<TransformError> for Error {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Generation(e) => Error::Generation(e),
            TransformError::Decode(e) => Error::Decode(e),
            TransformError::Capacity(e) => Error::InsufficientSize(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
