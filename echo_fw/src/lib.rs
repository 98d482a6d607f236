//! Parses and mutates the bitmap and font resources embedded in Echo Mini
//! firmware images: the fixed-offset register layout, the reversible glyph
//! codec, and the `ROCK26IMAGERES` resource directory with its Bootloader
//! reorganisation quirk.

pub mod analyzer;
pub mod binary;
pub mod bitmap;
pub mod directory;
pub mod engine;
pub mod error;
pub mod font;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::Engine;
pub use error::{EngineError, Result};
