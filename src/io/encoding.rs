//! Text decoding for CSV input.
//!
//! Only the encodings the explorer offers are accepted. `latin1` and
//! `iso-8859-1` decode every byte to the code point of the same value, while
//! `cp1252` rejects the five bytes the code page leaves undefined.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Byte positions left undefined by windows-1252.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Text encoding of the raw input bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Latin1,
    Iso8859_1,
    Cp1252,
}

impl TextEncoding {
    /// Canonical label, as shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin1",
            TextEncoding::Iso8859_1 => "iso-8859-1",
            TextEncoding::Cp1252 => "cp1252",
        }
    }

    /// All encodings offered to users, in menu order.
    pub fn all() -> [TextEncoding; 4] {
        [
            TextEncoding::Utf8,
            TextEncoding::Latin1,
            TextEncoding::Iso8859_1,
            TextEncoding::Cp1252,
        ]
    }

    /// Decodes `bytes` into a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] with the offset of the first offending byte
    /// when the input is not valid under this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => decode_utf8(bytes),
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => {
                Ok(bytes.iter().map(|&b| char::from(b)).collect())
            }
            TextEncoding::Cp1252 => self.decode_cp1252(bytes),
        }
    }

    fn decode_cp1252(&self, bytes: &[u8]) -> Result<String> {
        if let Some(position) = bytes.iter().position(|b| CP1252_UNDEFINED.contains(b)) {
            return Err(Error::Decode {
                encoding: self.label().to_string(),
                position,
            });
        }
        let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
        Ok(text.into_owned())
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => Ok(text.into_owned()),
        None => {
            let position = std::str::from_utf8(bytes)
                .err()
                .map(|e| e.valid_up_to())
                .unwrap_or(0);
            Err(Error::Decode {
                encoding: TextEncoding::Utf8.label().to_string(),
                position,
            })
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin1" | "latin-1" | "l1" => Ok(TextEncoding::Latin1),
            "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Iso8859_1),
            "cp1252" | "windows-1252" => Ok(TextEncoding::Cp1252),
            _ => Err(Error::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl Serialize for TextEncoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TextEncoding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
