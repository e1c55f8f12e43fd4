//! SBVJ I/O - Save file envelopes and debugging helpers
//!
//! This crate provides the layer between the byte-level codec and the disk:
//!
//! - The [`SaveFile`] envelope (header + one typed value)
//! - Readers and writers over `std::io` streams and paths
//! - A structural diff of two value trees

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod diff;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use diff::{diff, DiffReport, Mismatch, MismatchKind};
pub use reader::{read_save, read_save_file};
pub use sbvj_format::{Config, Header, Limits, Map, Result, SbvjError, Value};
pub use writer::{write_save, write_save_file};

use sbvj_format::constants::FLAGS_LEN;
use sbvj_format::{decode_header, decode_value_with_limits, encode_value_into};
use tracing::{debug, warn};

/// A decoded save file: header plus its single content value
#[derive(Debug, Clone, PartialEq)]
pub struct SaveFile {
    /// Envelope header
    pub header: Header,
    /// Typed content
    pub content: Value,
}

impl SaveFile {
    /// `SBVJ01` save for `entity` with zeroed flags
    pub fn new(entity: impl Into<String>, content: Value) -> Self {
        Self {
            header: Header::sbvj01(entity, [0; FLAGS_LEN]),
            content,
        }
    }

    /// Decode a whole save file; the content must end exactly at the end of `bytes`
    pub fn decode(bytes: &[u8], config: &Config) -> Result<Self> {
        Self::decode_with_limits(bytes, config, &Limits::default())
    }

    /// [`SaveFile::decode`] with explicit limits
    pub fn decode_with_limits(bytes: &[u8], config: &Config, limits: &Limits) -> Result<Self> {
        let (header, offset) = decode_header(bytes, 0, config)?;
        if !header.is_sbvj01() {
            warn!(format = %header.format_lossy(), "unexpected save format marker");
        }
        debug!(entity = %header.entity, offset, "decoded save header");

        let (content, end) = decode_value_with_limits(bytes, offset, config, limits)?;
        if end != bytes.len() {
            return Err(SbvjError::TrailingBytes {
                consumed: end,
                len: bytes.len(),
            });
        }
        debug!(len = end, "decoded save content");

        Ok(Self { header, content })
    }

    /// Encode header followed by content
    pub fn encode(&self, config: &Config) -> Result<Vec<u8>> {
        let mut bytes = self.header.encode(config)?;
        encode_value_into(&self.content, config, &Limits::default(), &mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SaveFile {
        let content: Value = [
            ("name", Value::from("Alen")),
            ("level", Value::Int(12)),
            ("scores", Value::List(vec![Value::Float(0.5), Value::Null])),
        ]
        .into_iter()
        .collect();
        SaveFile::new("PlayerEntity", content)
    }

    #[test]
    fn test_save_roundtrip() {
        let config = Config::default();
        let save = sample();
        let bytes = save.encode(&config).unwrap();
        assert_eq!(&bytes[..6], b"SBVJ01");
        assert_eq!(SaveFile::decode(&bytes, &config).unwrap(), save);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let config = Config::default();
        let mut bytes = sample().encode(&config).unwrap();
        let len = bytes.len();
        bytes.push(0x01);

        match SaveFile::decode(&bytes, &config) {
            Err(SbvjError::TrailingBytes { consumed, len: total }) => {
                assert_eq!(consumed, len);
                assert_eq!(total, len + 1);
            }
            other => panic!("expected TrailingBytes, got {other:?}"),
        }
    }

    #[test]
    fn test_foreign_format_still_decodes() {
        let config = Config::default();
        let mut save = sample();
        save.header.format = *b"XXXX99";
        let bytes = save.encode(&config).unwrap();
        assert_eq!(SaveFile::decode(&bytes, &config).unwrap(), save);
    }
}
