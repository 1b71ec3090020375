//! Non-deterministic byte generator.

use super::Generator;
use crate::error::GenerationError;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static INSTANCES: AtomicU64 = AtomicU64::new(0);

fn time_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    // Instances created within the same clock tick still get distinct seeds
    let instance = INSTANCES.fetch_add(1, Ordering::Relaxed);
    nanos ^ instance.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Random bytes of a fixed size; the input is ignored.
#[derive(Debug, Clone)]
pub struct RandomBytes {
    rng: StdRng,
    size: usize,
}

impl RandomBytes {
    /// Seeded from the current time.
    pub fn new(size: usize) -> Self {
        Self::with_seed(time_seed(), size)
    }

    pub fn with_seed(seed: u64, size: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            size,
        }
    }
}

impl Generator for RandomBytes {
    fn generate(&mut self, _input: &[u8]) -> Result<Vec<u8>, GenerationError> {
        let mut buf = vec![0u8; self.size];
        self.rng.fill_bytes(&mut buf);
        Ok(buf)
    }

    fn size(&self) -> usize {
        self.size
    }
}
