//! SipHash-2-4 keyed by a digest of the salt.

use super::Generator;
use crate::error::GenerationError;
use sha3::{Digest, Sha3_224};
use siphasher::sip::SipHasher24;
use std::hash::Hasher;

/// Output size of the keyed hash in bytes.
pub const SIPHASH_SIZE: usize = 8;

/// Keyed hasher state, reset whenever a scope over it ends.
#[derive(Debug, Clone)]
struct KeyedState {
    key: [u8; 16],
    hasher: SipHasher24,
}

impl KeyedState {
    fn new(key: [u8; 16]) -> Self {
        Self {
            key,
            hasher: SipHasher24::new_with_key(&key),
        }
    }

    fn scope(&mut self) -> HashScope<'_> {
        HashScope { state: self }
    }

    fn reset(&mut self) {
        self.hasher = SipHasher24::new_with_key(&self.key);
    }
}

/// Exclusive use of the hasher for one generation.
struct HashScope<'a> {
    state: &'a mut KeyedState,
}

impl HashScope<'_> {
    fn write(&mut self, data: &[u8]) {
        self.state.hasher.write(data);
    }

    fn sum(&self) -> [u8; SIPHASH_SIZE] {
        self.state.hasher.finish().to_le_bytes()
    }
}

impl Drop for HashScope<'_> {
    fn drop(&mut self) {
        self.state.reset();
    }
}

/// Fast deterministic 8-byte generator.
///
/// The 128-bit SipHash key is the first 16 bytes of `SHA3-224(salt)`.
#[derive(Debug, Clone)]
pub struct SaltedKeyedHash {
    state: KeyedState,
}

impl SaltedKeyedHash {
    pub fn new(salt: &[u8]) -> Self {
        let digest = Sha3_224::digest(salt);
        let mut key = [0u8; 16];
        key.copy_from_slice(&digest[..16]);
        Self {
            state: KeyedState::new(key),
        }
    }
}

impl Generator for SaltedKeyedHash {
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GenerationError> {
        let mut scope = self.state.scope();
        scope.write(input);
        Ok(scope.sum().to_vec())
    }

    fn size(&self) -> usize {
        SIPHASH_SIZE
    }
}
