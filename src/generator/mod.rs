//! Byte-stream generators.
//!
//! A generator turns input bytes into exactly `size()` output bytes. The
//! deterministic variants depend only on their salt and the input:
//! - `SaltedKeyedHash`: SipHash-2-4 keyed by a digest of the salt (8 bytes)
//! - `CryptoHash`: SHA-3 over `salt || input`, function chosen by size
//! - `SizeReducer`: folds another generator's output to fewer bytes
//! - `Chain`: pipes the input through several generators in order
//! - `Hybrid`: expands a fixed-size generator to any length
//!
//! `RandomBytes` ignores its input and is never reproducible.

mod chain;
mod crypto_hash;
mod hybrid;
mod keyed_hash;
mod random;
mod reducer;

pub use chain::Chain;
pub use crypto_hash::{CryptoHash, HashFunction, MAX_HASH_SIZE};
pub use hybrid::Hybrid;
pub use keyed_hash::{SaltedKeyedHash, SIPHASH_SIZE};
pub use random::RandomBytes;
pub use reducer::SizeReducer;

use crate::error::{ConfigError, GenerationError};
use serde::{Deserialize, Serialize};

/// Source of generated bytes.
///
/// `generate` takes `&mut self`: an instance is used by one caller at a time.
/// Parallel workers each own their generator.
pub trait Generator: Send {
    /// Produce exactly `size()` bytes for `input`.
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GenerationError>;

    /// Declared output size in bytes, constant for the generator's lifetime.
    fn size(&self) -> usize;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GenerationError> {
        (**self).generate(input)
    }

    fn size(&self) -> usize {
        (**self).size()
    }
}

/// Check that a generator honoured its declared size.
pub(crate) fn ensure_len(output: &[u8], expected: usize) -> Result<(), GenerationError> {
    if output.len() < expected {
        return Err(GenerationError::ShortOutput {
            expected,
            got: output.len(),
        });
    }
    Ok(())
}

/// How generated bytes are derived from the original value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Fresh random bytes on every call
    #[default]
    Random,
    /// Salted hash of the original value
    Deterministic,
}

impl Engine {
    /// Build a generator producing at least `size` bytes.
    ///
    /// Deterministic sizes up to 64 bytes use a single SHA-3 digest; longer
    /// outputs expand SipHash through `Hybrid`.
    pub fn generator(self, salt: &[u8], size: usize) -> Result<Box<dyn Generator>, ConfigError> {
        let generator: Box<dyn Generator> = match self {
            Engine::Random => Box::new(RandomBytes::new(size)),
            Engine::Deterministic if size <= MAX_HASH_SIZE => Box::new(CryptoHash::new(salt, size)?),
            Engine::Deterministic => {
                Box::new(Hybrid::new(Box::new(SaltedKeyedHash::new(salt)), size, 0)?)
            }
        };
        tracing::debug!(
            engine = %self,
            requested = size,
            size = generator.size(),
            "built generator"
        );
        Ok(generator)
    }
}

impl std::str::FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(Engine::Random),
            "deterministic" | "hash" => Ok(Engine::Deterministic),
            _ => Err(format!(
                "Unknown engine: {}. Valid options: random, deterministic",
                s
            )),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Random => write!(f, "random"),
            Engine::Deterministic => write!(f, "deterministic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_deterministic_small_uses_digest() {
        let mut g = Engine::Deterministic.generator(b"salt", 17).unwrap();
        assert_eq!(g.size(), 28);
        assert_eq!(g.generate(b"x").unwrap(), g.generate(b"x").unwrap());
    }

    #[test]
    fn test_engine_deterministic_large_uses_hybrid() {
        let mut g = Engine::Deterministic.generator(b"salt", 100).unwrap();
        assert_eq!(g.size(), 100);
        assert_eq!(g.generate(b"x").unwrap().len(), 100);
    }

    #[test]
    fn test_engine_random_size() {
        let mut g = Engine::Random.generator(b"", 9).unwrap();
        assert_eq!(g.size(), 9);
        assert_eq!(g.generate(b"ignored").unwrap().len(), 9);
    }

    #[test]
    fn test_engine_from_str() {
        assert_eq!("HASH".parse::<Engine>().unwrap(), Engine::Deterministic);
        assert_eq!("random".parse::<Engine>().unwrap(), Engine::Random);
        assert!("murmur".parse::<Engine>().is_err());
    }
}
