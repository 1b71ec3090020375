//! SHA-3 digest generator.

use super::Generator;
use crate::error::{ConfigError, GenerationError};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_224, Sha3_256, Sha3_384, Sha3_512};

/// Largest output a single digest can produce.
pub const MAX_HASH_SIZE: usize = 64;

/// Digest function backing a `CryptoHash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashFunction {
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl HashFunction {
    /// Smallest function producing at least `size` bytes.
    pub fn for_size(size: usize) -> Result<Self, ConfigError> {
        match size {
            0..=28 => Ok(HashFunction::Sha3_224),
            29..=32 => Ok(HashFunction::Sha3_256),
            33..=48 => Ok(HashFunction::Sha3_384),
            49..=64 => Ok(HashFunction::Sha3_512),
            _ => Err(ConfigError::UnsupportedSize(size)),
        }
    }

    pub fn output_size(self) -> usize {
        match self {
            HashFunction::Sha3_224 => 28,
            HashFunction::Sha3_256 => 32,
            HashFunction::Sha3_384 => 48,
            HashFunction::Sha3_512 => 64,
        }
    }

    fn digest(self, salt: &[u8], input: &[u8]) -> Vec<u8> {
        match self {
            HashFunction::Sha3_224 => salted::<Sha3_224>(salt, input),
            HashFunction::Sha3_256 => salted::<Sha3_256>(salt, input),
            HashFunction::Sha3_384 => salted::<Sha3_384>(salt, input),
            HashFunction::Sha3_512 => salted::<Sha3_512>(salt, input),
        }
    }
}

fn salted<D: Digest>(salt: &[u8], input: &[u8]) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(salt);
    hasher.update(input);
    hasher.finalize().to_vec()
}

/// Deterministic generator hashing `salt || input`.
#[derive(Debug, Clone)]
pub struct CryptoHash {
    salt: Vec<u8>,
    function: HashFunction,
}

impl CryptoHash {
    /// Select the digest by the number of bytes the caller needs.
    pub fn new(salt: &[u8], required_size: usize) -> Result<Self, ConfigError> {
        Ok(Self::with_function(salt, HashFunction::for_size(required_size)?))
    }

    pub fn with_function(salt: &[u8], function: HashFunction) -> Self {
        Self {
            salt: salt.to_vec(),
            function,
        }
    }

    pub fn function(&self) -> HashFunction {
        self.function
    }
}

impl Generator for CryptoHash {
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GenerationError> {
        Ok(self.function.digest(&self.salt, input))
    }

    fn size(&self) -> usize {
        self.function.output_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_selection_by_size() {
        assert_eq!(HashFunction::for_size(1).unwrap(), HashFunction::Sha3_224);
        assert_eq!(HashFunction::for_size(28).unwrap(), HashFunction::Sha3_224);
        assert_eq!(HashFunction::for_size(29).unwrap(), HashFunction::Sha3_256);
        assert_eq!(HashFunction::for_size(48).unwrap(), HashFunction::Sha3_384);
        assert_eq!(HashFunction::for_size(64).unwrap(), HashFunction::Sha3_512);
        assert_eq!(
            HashFunction::for_size(65),
            Err(ConfigError::UnsupportedSize(65))
        );
    }

    #[test]
    fn test_output_matches_declared_size() {
        for size in [9, 16, 30, 40, 64] {
            let mut g = CryptoHash::new(b"salt", size).unwrap();
            let out = g.generate(b"value").unwrap();
            assert_eq!(out.len(), g.size());
            assert!(g.size() >= size);
        }
    }

    #[test]
    fn test_salt_is_prepended() {
        let mut salted = CryptoHash::with_function(b"ab", HashFunction::Sha3_256);
        let mut unsalted = CryptoHash::with_function(b"", HashFunction::Sha3_256);
        assert_eq!(
            salted.generate(b"c").unwrap(),
            unsalted.generate(b"abc").unwrap()
        );
    }
}
