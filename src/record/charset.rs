//! Standard character encodings for header values.
//!
//! Kafka headers carry raw bytes. Tests usually think in text, so
//! [`Charset`] converts between the two using the same set of encodings
//! every JVM is required to support.

use crate::record::error::EncodingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const REPLACEMENT: u8 = b'?';

/// A character encoding usable for header values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Charset {
    #[default]
    Utf8,
    /// Big-endian with a leading byte order mark.
    Utf16,
    Utf16Be,
    Utf16Le,
    Iso8859_1,
    UsAscii,
}

impl Charset {
    /// Resolves a charset by its canonical name or one of its aliases.
    ///
    /// Matching is case-insensitive; `-` and `_` are interchangeable.
    ///
    /// # Example
    /// ```
    /// use kafka_harness::record::Charset;
    ///
    /// assert_eq!(Charset::for_name("utf8").unwrap(), Charset::Utf8);
    /// assert_eq!(Charset::for_name("Latin1").unwrap(), Charset::Iso8859_1);
    /// assert!(Charset::for_name("EBCDIC").is_err());
    /// ```
    pub fn for_name(label: &str) -> Result<Self, EncodingError> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-16" | "utf16" => Ok(Self::Utf16),
            "utf-16be" | "utf16be" | "unicodebigunmarked" => Ok(Self::Utf16Be),
            "utf-16le" | "utf16le" | "unicodelittleunmarked" => Ok(Self::Utf16Le),
            "iso-8859-1" | "iso8859-1" | "latin1" | "l1" => Ok(Self::Iso8859_1),
            "us-ascii" | "ascii" => Ok(Self::UsAscii),
            _ => Err(EncodingError::UnsupportedCharset(label.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
            Self::Iso8859_1 => "ISO-8859-1",
            Self::UsAscii => "US-ASCII",
        }
    }

    /// Encodes `text` into bytes.
    ///
    /// Characters the charset cannot represent are replaced with `?`.
    ///
    /// # Example
    /// ```
    /// use kafka_harness::record::Charset;
    ///
    /// assert_eq!(Charset::UsAscii.encode("café"), b"caf?");
    /// assert_eq!(Charset::Iso8859_1.encode("café"), b"caf\xE9");
    /// ```
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Iso8859_1 | Self::UsAscii => text
                .chars()
                .map(|c| self.single_byte(c).unwrap_or(REPLACEMENT))
                .collect(),
            _ => self.encode_unicode(text),
        }
    }

    /// Encodes `text`, failing with [`EncodingError::Unmappable`] on the
    /// first character the charset cannot represent.
    pub fn encode_strict(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        match self {
            Self::Iso8859_1 | Self::UsAscii => text
                .chars()
                .map(|c| {
                    self.single_byte(c).ok_or(EncodingError::Unmappable {
                        character: c,
                        charset: *self,
                    })
                })
                .collect(),
            _ => Ok(self.encode_unicode(text)),
        }
    }

    /// Decodes `bytes` back into text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, EncodingError> {
        let malformed = || EncodingError::Malformed { charset: *self };
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|_| malformed()),
            Self::Utf16 => {
                let decoded = match bytes {
                    [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                    [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                    _ => decode_utf16(bytes, u16::from_be_bytes),
                };
                decoded.ok_or_else(malformed)
            }
            Self::Utf16Be => decode_utf16(bytes, u16::from_be_bytes).ok_or_else(malformed),
            Self::Utf16Le => decode_utf16(bytes, u16::from_le_bytes).ok_or_else(malformed),
            Self::Iso8859_1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::UsAscii => {
                if bytes.is_ascii() {
                    Ok(bytes.iter().map(|&b| char::from(b)).collect())
                } else {
                    Err(malformed())
                }
            }
        }
    }

    fn encode_unicode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf16 => {
                let mut bytes = vec![0xFE, 0xFF];
                bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                bytes
            }
            Self::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Self::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            _ => text.as_bytes().to_vec(),
        }
    }

    fn single_byte(&self, c: char) -> Option<u8> {
        let max = match self {
            Self::UsAscii => 0x7F,
            _ => 0xFF,
        };
        u8::try_from(u32::from(c)).ok().filter(|b| *b <= max)
    }
}

impl TryFrom<&str> for Charset {
    type Error = EncodingError;

    fn try_from(label: &str) -> Result<Self, Self::Error> {
        Self::for_name(label)
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_utf8() {
        assert_eq!(Charset::default(), Charset::Utf8);
        assert_eq!(Charset::Utf8.encode_strict("é").unwrap(), vec![0xC3, 0xA9]);
    }

    #[test]
    fn test_utf16_variants() {
        assert_eq!(Charset::Utf16Be.encode("A"), vec![0x00, 0x41]);
        assert_eq!(Charset::Utf16Le.encode("A"), vec![0x41, 0x00]);
        assert_eq!(Charset::Utf16.encode("A"), vec![0xFE, 0xFF, 0x00, 0x41]);
        assert_eq!(
            Charset::Utf16.decode(&[0xFF, 0xFE, 0x41, 0x00]).unwrap(),
            "A"
        );
    }

    #[test]
    fn test_latin1_encodes_accents() {
        assert_eq!(Charset::Iso8859_1.encode("é"), vec![0xE9]);
        assert_eq!(Charset::Iso8859_1.decode(&[0xE9]).unwrap(), "é");
    }

    #[test]
    fn test_unmappable_characters_are_replaced() {
        assert_eq!(Charset::UsAscii.encode("café"), b"caf?".to_vec());
        assert_eq!(Charset::Iso8859_1.encode("5€"), b"5?".to_vec());
        // One replacement per character, not per UTF-16 unit.
        assert_eq!(Charset::UsAscii.encode("a😀b"), b"a?b".to_vec());
    }

    #[test]
    fn test_strict_encoding_rejects_non_ascii() {
        let err = Charset::UsAscii.encode_strict("café").unwrap_err();
        assert_eq!(
            err,
            EncodingError::Unmappable {
                character: 'é',
                charset: Charset::UsAscii,
            }
        );
        assert!(Charset::UsAscii.decode(&[0xE9]).is_err());
    }

    #[test]
    fn test_malformed_utf8() {
        assert_eq!(
            Charset::Utf8.decode(&[0xC3]),
            Err(EncodingError::Malformed {
                charset: Charset::Utf8
            })
        );
    }

    #[test]
    fn test_odd_length_utf16_is_malformed() {
        assert!(Charset::Utf16Be.decode(&[0x00]).is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("US_ASCII".parse::<Charset>().unwrap(), Charset::UsAscii);
        assert_eq!(Charset::try_from("utf-16le").unwrap(), Charset::Utf16Le);
        assert_eq!(
            "koi8-r".parse::<Charset>(),
            Err(EncodingError::UnsupportedCharset("koi8-r".to_string()))
        );
    }
}
