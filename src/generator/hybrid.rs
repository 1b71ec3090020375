//! Fixed-size to arbitrary-length expansion.

use super::{ensure_len, Generator};
use crate::error::{ConfigError, GenerationError};

/// Expands a fixed-size deterministic generator to `size` bytes.
///
/// The inner generator is called on `input || counter` (counter as 8
/// little-endian bytes, starting at `offset`), and the outputs are
/// concatenated until `size` bytes are available.
pub struct Hybrid {
    inner: Box<dyn Generator>,
    size: usize,
    offset: u64,
}

impl Hybrid {
    pub fn new(inner: Box<dyn Generator>, size: usize, offset: u64) -> Result<Self, ConfigError> {
        if inner.size() == 0 {
            return Err(ConfigError::UnsupportedSize(0));
        }
        Ok(Self {
            inner,
            size,
            offset,
        })
    }
}

impl Generator for Hybrid {
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GenerationError> {
        let block = self.inner.size();
        let mut out = Vec::with_capacity(self.size + block);
        let mut derived = Vec::with_capacity(input.len() + 8);
        let mut counter = self.offset;

        while out.len() < self.size {
            derived.clear();
            derived.extend_from_slice(input);
            derived.extend_from_slice(&counter.to_le_bytes());

            let chunk = self.inner.generate(&derived)?;
            ensure_len(&chunk, block)?;
            out.extend_from_slice(&chunk[..block]);
            counter = counter.wrapping_add(1);
        }

        out.truncate(self.size);
        Ok(out)
    }

    fn size(&self) -> usize {
        self.size
    }
}
