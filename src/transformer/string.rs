use super::GeneratorSlot;
use crate::decode::{decode_u16, decode_u32};
use crate::error::{ConfigError, InsufficientSizeError, TransformError};
use crate::generator::{Generator, HashFunction, MAX_HASH_SIZE};

/// Random strings over a fixed alphabet.
///
/// The first 4 bytes choose the length in `[min_length, max_length]`; the
/// rest select characters, one byte each (two for alphabets over 256
/// characters). When the bytes run out, selection restarts from the
/// beginning with the index shifted by the number of restarts.
#[derive(Debug)]
pub struct RandomStringTransformer {
    slot: GeneratorSlot,
    alphabet: Vec<char>,
    min_length: usize,
    max_length: usize,
    bytes_per_char: usize,
}

impl RandomStringTransformer {
    pub fn new(alphabet: &str, min_length: usize, max_length: usize) -> Result<Self, ConfigError> {
        let alphabet: Vec<char> = alphabet.chars().collect();
        if alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if min_length > max_length {
            return Err(ConfigError::InvalidLength {
                min: min_length,
                max: max_length,
            });
        }
        let bytes_per_char = if alphabet.len() > 256 { 2 } else { 1 };
        let wanted = max_length
            .saturating_mul(bytes_per_char)
            .saturating_add(4)
            .min(MAX_HASH_SIZE);
        let required = HashFunction::for_size(wanted)?.output_size();

        Ok(Self {
            slot: GeneratorSlot::new(required),
            alphabet,
            min_length,
            max_length,
            bytes_per_char,
        })
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    pub fn transform(&mut self, original: &[u8]) -> Result<String, TransformError> {
        let bytes = self.slot.generate(original)?;
        let span = (self.max_length - self.min_length) as u64 + 1;
        let length = self.min_length + (decode_u32(&bytes[..4]) as u64 % span) as usize;

        let rest = &bytes[4..];
        let bpc = self.bytes_per_char;
        let mut out = String::with_capacity(length);
        let mut idx = 0;
        let mut sub_iteration = 0;
        for _ in 0..length {
            if idx + bpc > rest.len() {
                idx = 0;
                sub_iteration += 1;
            }
            let raw = if bpc == 1 {
                rest[idx] as usize
            } else {
                decode_u16(&rest[idx..idx + 2]) as usize
            };
            out.push(self.alphabet[(raw + sub_iteration) % self.alphabet.len()]);
            idx += bpc;
        }
        Ok(out)
    }
}
