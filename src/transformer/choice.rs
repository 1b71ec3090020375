//! UUIDs, booleans and picks from a fixed list.

use super::GeneratorSlot;
use crate::decode::decode_u32;
use crate::error::{ConfigError, InsufficientSizeError, TransformError};
use crate::generator::Generator;
use uuid::Uuid;

#[derive(Debug)]
pub struct RandomUuidTransformer {
    slot: GeneratorSlot,
}

impl RandomUuidTransformer {
    pub fn new() -> Self {
        Self {
            slot: GeneratorSlot::new(16),
        }
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    pub fn transform(&mut self, original: &[u8]) -> Result<Uuid, TransformError> {
        let bytes = self.slot.generate(original)?;
        let mut raw = [0u8; 16];
        raw.copy_from_slice(&bytes[..16]);
        Ok(Uuid::from_bytes(raw))
    }
}

impl Default for RandomUuidTransformer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct RandomBoolTransformer {
    slot: GeneratorSlot,
}

impl RandomBoolTransformer {
    pub fn new() -> Self {
        Self {
            slot: GeneratorSlot::new(1),
        }
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    /// Odd first byte means `true`.
    pub fn transform(&mut self, original: &[u8]) -> Result<bool, TransformError> {
        let bytes = self.slot.generate(original)?;
        Ok(bytes[0] % 2 == 1)
    }
}

impl Default for RandomBoolTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform pick from a non-empty list.
#[derive(Debug)]
pub struct RandomChoiceTransformer<T> {
    slot: GeneratorSlot,
    choices: Vec<T>,
}

impl<T: Clone> RandomChoiceTransformer<T> {
    pub fn new(choices: Vec<T>) -> Result<Self, ConfigError> {
        if choices.is_empty() {
            return Err(ConfigError::EmptyChoices);
        }
        Ok(Self {
            slot: GeneratorSlot::new(4),
            choices,
        })
    }

    pub fn choices(&self) -> &[T] {
        &self.choices
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    pub fn transform(&mut self, original: &[u8]) -> Result<T, TransformError> {
        let bytes = self.slot.generate(original)?;
        let idx = decode_u32(&bytes) as usize % self.choices.len();
        Ok(self.choices[idx].clone())
    }
}
