//! Value synthesis for anonymizing sensitive columns.
//!
//! A [`transformer::Transformer`] draws bytes from a [`generator::Generator`]
//! and turns them into a bounded replacement value: either fully random or a
//! noised version of the original. With the deterministic engine the same
//! original and salt always produce the same replacement.

pub mod config;
pub mod decode;
pub mod error;
pub mod generator;
pub mod limiter;
pub mod transformer;

pub use error::{Error, Result};
