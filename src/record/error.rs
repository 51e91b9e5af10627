//! Errors raised while turning header text into bytes and back.

use crate::record::charset::Charset;
use thiserror::Error;

/// Represents the ways a header value can fail to encode or decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The requested charset label is not one of the standard charsets.
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// A character has no representation in the target charset.
    #[error("Character {character:?} cannot be encoded as {charset}")]
    Unmappable { character: char, charset: Charset },

    /// The bytes are not a valid sequence in the given charset.
    #[error("Malformed {charset} input")]
    Malformed { charset: Charset },
}

impl From<std::convert::Infallible> for EncodingError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
