//! Wire text encodings
// (c) 2026 ftpc contributors
//!
//! Everything on the control channel, and the file frames on ephemeral channels,
//! passes through a text encoding. The protocol default is UTF-32, which means
//! that file contents are treated as text: they must be valid UTF-8 locally and
//! each character costs four bytes on the wire.
//!
//! <div class="warning">
//! Text encodings are not binary safe. Files which are not valid UTF-8, or which
//! contain characters the encoding cannot represent, are refused before anything
//! is sent. The [`Encoding::Binary`] mode is byte-transparent, but it is a
//! different wire format and the server must be configured to match.
//! </div>
//!
//! We never send a byte-order mark. Some UTF-32 peers put one at the start of every
//! send; a leading little-endian mark on received text is skipped, and a big-endian
//! one is refused.

use serde::{de, Deserialize, Serialize};
use strum::VariantNames as _;

use crate::{Error, Result};

/// UTF-32 little-endian byte-order mark (U+FEFF)
const UTF32_LE_BOM: [u8; 4] = [0xFF, 0xFE, 0, 0];
/// UTF-32 big-endian byte-order mark
const UTF32_BE_BOM: [u8; 4] = [0, 0, 0xFE, 0xFF];

/// Selects the encoding used on the wire
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
    clap::ValueEnum,
    Serialize,
)]
pub enum Encoding {
    /// UTF-32, little-endian, without a byte-order mark. Four bytes per character.
    #[default]
    #[strum(to_string = "utf-32", serialize = "utf32")]
    #[serde(rename = "utf-32")]
    #[value(name = "utf-32", alias = "utf32")]
    Utf32,
    /// ISO-8859-1. One byte per character; characters above U+00FF cannot be sent.
    #[strum(to_string = "latin-1", serialize = "latin1", serialize = "iso-8859-1")]
    #[serde(rename = "latin-1")]
    #[value(name = "latin-1", alias = "latin1")]
    Latin1,
    /// File payloads are sent verbatim and their length is counted in bytes.
    /// Command lines are sent as UTF-8.
    #[strum(to_string = "binary")]
    #[serde(rename = "binary")]
    #[value(name = "binary")]
    Binary,
}

impl<'de> Deserialize<'de> for Encoding {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let lower = s.to_ascii_lowercase();
        std::str::FromStr::from_str(&lower)
            .map_err(|_| de::Error::unknown_variant(&s, Encoding::VARIANTS))
    }
}

impl Encoding {
    /// Number of bytes on the wire per character (or per byte, in binary mode)
    #[must_use]
    pub fn unit_width(self) -> usize {
        match self {
            Encoding::Utf32 => 4,
            Encoding::Latin1 | Encoding::Binary => 1,
        }
    }

    /// Encodes a string for the wire
    pub fn encode_str(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Encoding::Utf32 => Ok(text
                .chars()
                .flat_map(|c| u32::from(c).to_le_bytes())
                .collect()),
            Encoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        Error::Encoding(format!("character {c:?} is not representable in {self}"))
                    })
                })
                .collect(),
            Encoding::Binary => Ok(text.as_bytes().to_vec()),
        }
    }

    /// Does this received data start with a byte-order mark we should skip?
    #[must_use]
    pub fn starts_with_bom(self, bytes: &[u8]) -> bool {
        self == Encoding::Utf32 && bytes.starts_with(&UTF32_LE_BOM)
    }

    /// Decodes a string from the wire, skipping any leading byte-order mark
    pub fn decode_str(self, bytes: &[u8]) -> Result<String> {
        if self != Encoding::Utf32 {
            return self.decode_units(bytes);
        }
        if bytes.starts_with(&UTF32_BE_BOM) {
            return Err(Error::Encoding(
                "peer sent big-endian UTF-32; only little-endian is supported".into(),
            ));
        }
        let bytes = bytes.strip_prefix(&UTF32_LE_BOM[..]).unwrap_or(bytes);
        self.decode_units(bytes)
    }

    fn decode_units(self, bytes: &[u8]) -> Result<String> {
        match self {
            Encoding::Utf32 => {
                if bytes.len() % 4 != 0 {
                    return Err(Error::Encoding(format!(
                        "{} bytes is not a whole number of {self} characters",
                        bytes.len()
                    )));
                }
                bytes
                    .chunks_exact(4)
                    .map(|c| {
                        let code = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
                        char::from_u32(code).ok_or_else(|| {
                            Error::Encoding(format!("invalid {self} code point {code:#x}"))
                        })
                    })
                    .collect()
            }
            Encoding::Latin1 => Ok(bytes.iter().copied().map(char::from).collect()),
            Encoding::Binary => String::from_utf8(bytes.to_vec())
                .map_err(|e| Error::Encoding(format!("received text was not UTF-8: {e}"))),
        }
    }

    /// Prepares local file content for a frame.
    ///
    /// Returns the length to declare in the frame header (in characters, or
    /// bytes in binary mode) and the payload bytes to put on the wire.
    pub fn encode_payload(self, content: &[u8]) -> Result<(u64, Vec<u8>)> {
        if self == Encoding::Binary {
            return Ok((content.len() as u64, content.to_vec()));
        }
        let text = std::str::from_utf8(content).map_err(|e| {
            Error::Encoding(format!(
                "file content is not text and cannot be sent as {self} ({e})"
            ))
        })?;
        let units = text.chars().count() as u64;
        Ok((units, self.encode_str(text)?))
    }

    /// Converts a received frame payload back into local file content.
    ///
    /// A U+FEFF here is file content, not a byte-order mark, so it is kept.
    pub fn decode_payload(self, wire: &[u8]) -> Result<Vec<u8>> {
        if self == Encoding::Binary {
            return Ok(wire.to_vec());
        }
        Ok(self.decode_units(wire)?.into_bytes())
    }
}
