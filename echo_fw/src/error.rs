//! Error kinds surfaced by the resource engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Everything that can go wrong while parsing or mutating a firmware image.
///
/// A failed read or write never touches the firmware buffer; callers can
/// retry with corrected input without worrying about partial mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("offset {offset:#x} (len {len}) is out of bounds for a buffer of size {buf_len:#x}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        buf_len: usize,
    },

    #[error("ROCK26IMAGERES signature not found in Part 5")]
    SignatureNotFound,

    #[error("no metadata table candidate correlates with the anchor table")]
    MetadataNotFound,

    #[error("no resource named {0:?}")]
    NameNotFound(String),

    #[error("payload size {actual} does not match expected size {expected}")]
    InvalidPayloadSize { expected: usize, actual: usize },

    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("payload content rejected: {0}")]
    InvalidPayloadContent(&'static str),

    #[error("invalid format: {0}")]
    InvalidFormat(&'static str),

    #[error("encode/decode round-trip did not reproduce the input pixels")]
    CodecDisagreement,
}
