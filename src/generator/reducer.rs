//! Size-reducing wrapper.

use super::{ensure_len, Generator};
use crate::error::{ConfigError, GenerationError};

/// Folds the inner generator's output down to `size` bytes.
///
/// Every inner byte is XOR-ed into position `i % size`, so no part of the
/// inner output is discarded.
pub struct SizeReducer {
    inner: Box<dyn Generator>,
    size: usize,
}

impl SizeReducer {
    pub fn new(inner: Box<dyn Generator>, size: usize) -> Result<Self, ConfigError> {
        if size > inner.size() {
            return Err(ConfigError::SizeIncrease {
                requested: size,
                available: inner.size(),
            });
        }
        if size == 0 {
            return Err(ConfigError::UnsupportedSize(0));
        }
        Ok(Self { inner, size })
    }
}

impl Generator for SizeReducer {
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GenerationError> {
        let raw = self.inner.generate(input)?;
        ensure_len(&raw, self.inner.size())?;
        let mut out = vec![0u8; self.size];
        for (i, b) in raw.iter().enumerate() {
            out[i % self.size] ^= b;
        }
        Ok(out)
    }

    fn size(&self) -> usize {
        self.size
    }
}
