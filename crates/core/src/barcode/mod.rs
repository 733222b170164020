//! Barcode rendering for tracking codes.
//!
//! The assembler only needs `encode(text) -> image bytes`; an empty result
//! means "keep the template's image".

mod code128;

pub use code128::{Code128Encoder, Code128Options};

use thiserror::Error;

/// Errors raised while rendering a barcode.
#[derive(Debug, Error)]
pub enum BarcodeError {
    /// Nothing to encode.
    #[error("Cannot encode an empty string")]
    Empty,

    /// Character outside the printable ASCII range.
    #[error("Character {0:?} cannot be encoded")]
    UnsupportedCharacter(char),

    /// PNG encoding failed.
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Turns a string into barcode image bytes.
pub trait BarcodeEncoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Render `text`. Failures yield an empty vector.
    fn encode(&self, text: &str) -> Vec<u8>;
}
