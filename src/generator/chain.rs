//! Sequential composition of generators.

use super::{ensure_len, Generator};
use crate::error::{ConfigError, GenerationError};

/// Feeds the input to the first stage and every output to the next one.
pub struct Chain {
    stages: Vec<Box<dyn Generator>>,
}

impl Chain {
    pub fn new(stages: Vec<Box<dyn Generator>>) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::EmptyChain);
        }
        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Generator for Chain {
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GenerationError> {
        let mut data = input.to_vec();
        for (index, stage) in self.stages.iter_mut().enumerate() {
            let size = stage.size();
            data = stage
                .generate(&data)
                .and_then(|out| ensure_len(&out, size).map(|_| out))
                .map_err(|e| GenerationError::Stage {
                    index,
                    source: Box::new(e),
                })?;
        }
        Ok(data)
    }

    fn size(&self) -> usize {
        // Constructor guarantees at least one stage
        self.stages.last().map(|g| g.size()).unwrap_or_default()
    }
}
